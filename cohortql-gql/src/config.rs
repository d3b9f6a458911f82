/// Limits applied while inlining filter-set references.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    pub max_depth: Option<usize>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(32),
        }
    }
}

impl ResolverConfig {
    pub fn merge(&self, overrides: &ResolverOptions) -> Self {
        Self {
            max_depth: overrides.max_depth.or(self.max_depth),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResolverOptions {
    pub max_depth: Option<usize>,
}
