use indexmap::IndexMap;

/// Field entries partitioned by their first dotted path segment.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldGroups<'a, T> {
    /// Entries whose key has no `.`, in encounter order.
    pub main: Vec<(&'a str, T)>,
    /// Entries keyed by parent path, in first-occurrence order. Member keys
    /// are the remainder after the first `.`.
    pub nested: IndexMap<&'a str, Vec<(&'a str, T)>>,
}

impl<T> Default for FieldGroups<'_, T> {
    fn default() -> Self {
        Self {
            main: Vec::new(),
            nested: IndexMap::new(),
        }
    }
}

pub fn group_fields<'a, T, I>(entries: I) -> FieldGroups<'a, T>
where
    I: IntoIterator<Item = (&'a str, T)>,
{
    let mut groups = FieldGroups::default();

    for (key, item) in entries {
        match key.split_once('.') {
            Some((path, rest)) => groups.nested.entry(path).or_default().push((rest, item)),
            None => groups.main.push((key, item)),
        }
    }

    groups
}

/// Parent path of a dotted field key.
pub fn parent_path(key: &str) -> Option<&str> {
    key.split_once('.').map(|(path, _)| path)
}
