use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::StoplistError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    C,
    Cpp,
    Java,
    Python,
}

impl Language {
    pub const ALL: [Language; 4] = [Self::C, Self::Cpp, Self::Java, Self::Python];

    pub fn parse(raw: &str) -> Result<Self, StoplistError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "c" => Ok(Self::C),
            "cpp" | "c++" | "cxx" => Ok(Self::Cpp),
            "java" => Ok(Self::Java),
            "py" | "python" | "python3" => Ok(Self::Python),
            _ => Err(StoplistError::UnknownLanguage(raw.to_string())),
        }
    }

    fn words(self) -> &'static [&'static str] {
        match self {
            Self::C => C_WORDS,
            Self::Cpp => CPP_WORDS,
            Self::Java => JAVA_WORDS,
            Self::Python => PYTHON_WORDS,
        }
    }
}

const C_WORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "break", "continue",
    "return", "goto", "int", "long", "float", "double", "char", "bool", "void", "unsigned",
    "signed", "short", "auto", "struct", "union", "enum", "typedef", "const", "static",
    "extern", "register", "volatile", "inline", "sizeof", "true", "false", "NULL", "null",
    "include", "define", "ifdef", "ifndef", "endif", "pragma", "main", "scanf", "printf",
    "gets", "puts", "getchar", "putchar", "fgets", "malloc", "free", "memset", "strlen",
];

const CPP_WORDS: &[&str] = &[
    "class", "public", "private", "protected", "namespace", "using", "virtual", "override",
    "new", "delete", "nullptr", "this", "template", "typename", "try", "catch", "throw",
    "string", "std", "cin", "cout", "cerr", "endl", "ios", "sync_with_stdio", "tie",
    "vector", "map", "set", "pair", "queue", "stack", "deque", "priority_queue",
    "unordered_map", "unordered_set", "make_pair", "first", "second", "sort", "min", "max",
    "abs", "swap", "push_back", "pop_back", "push", "pop", "front", "back", "top", "begin",
    "end", "size", "empty", "clear", "insert", "erase", "find", "count",
];

const JAVA_WORDS: &[&str] = &[
    "class", "public", "private", "protected", "static", "final", "void", "new", "this",
    "super", "extends", "implements", "interface", "package", "import", "try", "catch",
    "finally", "throw", "throws", "boolean", "byte", "int", "long", "float", "double",
    "char", "short", "String", "Integer", "Long", "Double", "Math", "System", "out", "in",
    "println", "print", "printf", "Scanner", "nextInt", "nextLong", "nextLine", "next",
    "args", "main", "length", "ArrayList", "HashMap", "List", "Map", "add", "get", "size",
];

const PYTHON_WORDS: &[&str] = &[
    "if", "elif", "else", "for", "while", "break", "continue", "return", "def", "class",
    "print", "input", "range", "len", "int", "float", "str", "list", "dict", "set", "tuple",
    "map", "split", "strip", "append", "sum", "min", "max", "abs", "sorted", "import",
    "from", "as", "in", "and", "or", "not", "is", "lambda", "pass", "with", "assert",
    "yield", "global", "nonlocal", "raise", "try", "except", "finally", "True", "False",
    "None", "self", "cls",
];

/// Words excluded from identifier sets: language keywords, primitive type
/// names and standard-library names every submission shares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stoplist {
    words: HashSet<String>,
}

impl Stoplist {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Union of every built-in language list.
    pub fn builtin() -> Self {
        Self::for_languages(&Language::ALL)
    }

    pub fn for_languages(languages: &[Language]) -> Self {
        let mut stoplist = Self::empty();
        for language in languages {
            stoplist.extend(language.words().iter().copied());
        }
        stoplist
    }

    /// Parses one word per line; blank lines and `#` comments are ignored.
    pub fn parse(text: &str) -> Self {
        let mut stoplist = Self::empty();
        stoplist.extend(
            text.lines()
                .map(|line| line.split('#').next().unwrap_or("").trim())
                .filter(|word| !word.is_empty()),
        );
        stoplist
    }

    pub fn load(path: &Path) -> Result<Self, StoplistError> {
        let text = fs::read_to_string(path).map_err(|source| StoplistError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    pub fn insert(&mut self, word: impl Into<String>) -> bool {
        self.words.insert(word.into())
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words.extend(words.into_iter().map(Into::into));
    }

    pub fn merge(&mut self, other: Stoplist) {
        self.words.extend(other.words);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_language() {
        let stoplist = Stoplist::builtin();
        for word in ["while", "cout", "vector", "println", "System", "def", "self", "int"] {
            assert!(stoplist.contains(word), "{word} missing");
        }
        assert!(!stoplist.contains("total"));
    }

    #[test]
    fn per_language_lists_are_narrower() {
        let python = Stoplist::for_languages(&[Language::Python]);
        assert!(python.contains("elif"));
        assert!(!python.contains("cout"));
        assert!(python.len() < Stoplist::builtin().len());
    }

    #[test]
    fn parse_ignores_comments_and_blank_lines() {
        let stoplist = Stoplist::parse("# project helpers\nread_int\n\n  fast_io  # io\n");
        assert_eq!(stoplist.len(), 2);
        assert!(stoplist.contains("read_int"));
        assert!(stoplist.contains("fast_io"));
    }

    #[test]
    fn merge_extends_builtin() {
        let mut stoplist = Stoplist::builtin();
        let before = stoplist.len();
        stoplist.merge(Stoplist::parse("read_int\nwhile\n"));
        assert_eq!(stoplist.len(), before + 1);
    }

    #[test]
    fn language_parse_accepts_aliases() {
        assert_eq!(Language::parse("C++").ok(), Some(Language::Cpp));
        assert_eq!(Language::parse("python3").ok(), Some(Language::Python));
        assert!(Language::parse("cobol").is_err());
    }
}
