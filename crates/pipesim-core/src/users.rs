use crate::random::RandomSource;

/// The user every dashboard filters on; always part of the generated pool.
pub const CREATOR_AUTHOR: &str = "Createy McCreateFace";

const GENERATED_USERS: usize = 9;

/// The configured set of identities authors and assignees are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPool {
    users: Vec<String>,
}

impl UserPool {
    /// Build a pool from an explicit list, dropping blanks and duplicates.
    /// Returns `None` when nothing usable is left.
    pub fn from_names<I, S>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut users: Vec<String> = Vec::new();
        for name in names {
            let name = name.into().trim().to_string();
            if !name.is_empty() && !users.contains(&name) {
                users.push(name);
            }
        }
        if users.is_empty() {
            None
        } else {
            Some(Self { users })
        }
    }

    /// The creator plus nine generated names.
    pub fn generate(rng: &mut dyn RandomSource) -> Self {
        let mut users = vec![CREATOR_AUTHOR.to_string()];
        // Name lists are finite; bound the attempts so a tiny list can't spin.
        let mut attempts = 0;
        while users.len() < GENERATED_USERS + 1 && attempts < 200 {
            let name = rng.full_name();
            if !users.contains(&name) {
                users.push(name);
            }
            attempts += 1;
        }
        Self { users }
    }

    pub fn pick(&self, rng: &mut dyn RandomSource) -> &str {
        let i = rng.pick_index(self.users.len()).unwrap_or(0);
        &self.users[i]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.users.iter().any(|u| u == name)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    #[test]
    fn generated_pool_has_creator_and_ten_users() {
        let mut rng = SeededRandom::new(Some(5));
        let pool = UserPool::generate(&mut rng);
        assert_eq!(pool.len(), 10);
        assert_eq!(pool.as_slice()[0], CREATOR_AUTHOR);
    }

    #[test]
    fn explicit_names_are_deduplicated() {
        let pool = UserPool::from_names(["ann", " ann ", "", "bob"]).unwrap();
        assert_eq!(pool.as_slice(), &["ann".to_string(), "bob".to_string()]);
        assert!(UserPool::from_names(["  "]).is_none());
    }

    #[test]
    fn pick_always_returns_a_member() {
        let mut rng = SeededRandom::new(Some(9));
        let pool = UserPool::from_names(["ann", "bob", "cy"]).unwrap();
        for _ in 0..50 {
            assert!(pool.contains(pool.pick(&mut rng)));
        }
    }
}
