use std::collections::BTreeSet;

use crate::types::{
    ProblemId, RankingPolicy, RankingRow, RankingTables, UserAggregate, UserDirectory,
};

impl UserAggregate {
    /// Accepted problems that count as copied under `policy`. Copies of
    /// problems the user never solved carry no penalty.
    pub fn copied_accepted(&self, policy: RankingPolicy) -> usize {
        match self.flagged(policy) {
            Some(flagged) => flagged.intersection(&self.accepted).count(),
            None => 0,
        }
    }

    /// Copy-adjusted score under `policy`.
    pub fn valid(&self, policy: RankingPolicy) -> usize {
        match policy {
            RankingPolicy::Unfiltered => self.accepted.len(),
            RankingPolicy::Exact => self.valid_after_exact.len(),
            RankingPolicy::Form => self.valid_after_form.len(),
        }
    }

    fn flagged(&self, policy: RankingPolicy) -> Option<&BTreeSet<ProblemId>> {
        match policy {
            RankingPolicy::Unfiltered => None,
            RankingPolicy::Exact => Some(&self.copied_exact),
            RankingPolicy::Form => Some(&self.copied_form),
        }
    }
}

/// Ranks users by copy-adjusted score, highest first. Equal scores are
/// ordered by username, then by user id.
pub fn rank_users(
    users: &[UserAggregate],
    directory: &UserDirectory,
    policy: RankingPolicy,
) -> Vec<RankingRow> {
    let mut rows: Vec<RankingRow> = users
        .iter()
        .map(|user| RankingRow {
            rank: 0,
            user_id: user.user_id,
            username: directory.username(user.user_id),
            attempted: user.attempted.len(),
            accepted: user.accepted.len(),
            wrong_answer: user.wrong_answer.len(),
            copied: user.copied_accepted(policy),
            valid: user.valid(policy),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.valid
            .cmp(&a.valid)
            .then_with(|| a.username.cmp(&b.username))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
    rows
}

pub fn rank_all(users: &[UserAggregate], directory: &UserDirectory) -> RankingTables {
    RankingTables {
        unfiltered: rank_users(users, directory, RankingPolicy::Unfiltered),
        exact: rank_users(users, directory, RankingPolicy::Exact),
        form: rank_users(users, directory, RankingPolicy::Form),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserProfile;

    fn set(ids: &[ProblemId]) -> BTreeSet<ProblemId> {
        ids.iter().copied().collect()
    }

    fn user(user_id: u64, accepted: &[ProblemId], exact: &[ProblemId], form: &[ProblemId]) -> UserAggregate {
        let accepted = set(accepted);
        let copied_exact = set(exact);
        let copied_form = set(form);
        UserAggregate {
            user_id,
            attempted: accepted.clone(),
            valid_after_exact: accepted.difference(&copied_exact).copied().collect(),
            valid_after_form: accepted.difference(&copied_form).copied().collect(),
            accepted,
            wrong_answer: BTreeSet::new(),
            copied_exact,
            copied_form,
        }
    }

    fn directory(names: &[(u64, &str)]) -> UserDirectory {
        let mut dir = UserDirectory::default();
        for &(id, name) in names {
            dir.insert(
                id,
                UserProfile {
                    username: name.to_string(),
                    full_name: String::new(),
                },
            );
        }
        dir
    }

    #[test]
    fn unfiltered_policy_ignores_copies() {
        let users = [user(1, &[1, 2, 3], &[1], &[1, 2])];
        let rows = rank_users(&users, &UserDirectory::default(), RankingPolicy::Unfiltered);
        assert_eq!((rows[0].copied, rows[0].valid), (0, 3));
        assert_eq!(rows[0].username, "user1");
    }

    #[test]
    fn copied_counts_only_accepted_problems() {
        // problem 9 was copied but never accepted
        let users = [user(1, &[1, 2], &[2, 9], &[1, 2, 9])];
        let dir = UserDirectory::default();
        let exact = rank_users(&users, &dir, RankingPolicy::Exact);
        assert_eq!((exact[0].copied, exact[0].valid), (1, 1));
        let form = rank_users(&users, &dir, RankingPolicy::Form);
        assert_eq!((form[0].copied, form[0].valid), (2, 0));
    }

    #[test]
    fn sorts_by_valid_then_username() {
        let users = [
            user(1, &[1], &[], &[]),
            user(2, &[1, 2, 3], &[1, 2], &[1, 2]),
            user(3, &[1], &[], &[]),
            user(4, &[1, 2], &[], &[]),
        ];
        let dir = directory(&[(1, "zoe"), (2, "bao"), (3, "an"), (4, "minh")]);

        let unfiltered = rank_users(&users, &dir, RankingPolicy::Unfiltered);
        let order: Vec<&str> = unfiltered.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(order, ["bao", "minh", "an", "zoe"]);

        let exact = rank_users(&users, &dir, RankingPolicy::Exact);
        let order: Vec<(usize, &str)> = exact.iter().map(|r| (r.rank, r.username.as_str())).collect();
        assert_eq!(order, [(1, "minh"), (2, "an"), (3, "bao"), (4, "zoe")]);
    }

    #[test]
    fn rank_all_builds_every_table() {
        let users = [user(1, &[1, 2], &[1], &[1, 2])];
        let tables = rank_all(&users, &UserDirectory::default());
        assert_eq!(tables.get(RankingPolicy::Unfiltered)[0].valid, 2);
        assert_eq!(tables.get(RankingPolicy::Exact)[0].valid, 1);
        assert_eq!(tables.get(RankingPolicy::Form)[0].valid, 0);
    }
}
