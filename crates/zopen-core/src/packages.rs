//! The fixed, ordered table of bootstrap packages.
//!
//! Every package except the primary one lives in a repository named
//! `<package>port`; the primary package's repository carries no suffix. The
//! suffix is resolved once when the table is built and stored on each entry.

/// The package whose repository name has no suffix.
pub const PRIMARY_PACKAGE: &str = "utils";

/// Suffix token appended to every other package's repository name.
pub const PORT_SUFFIX: &str = "port";

/// Packages installed into the boot tier, in install order.
pub const BOOT_PACKAGES: &[&str] = &["utils", "curl", "gzip", "jq", "git"];

/// URI suffix attached to a package's repository segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriSuffix {
    /// Repository is named after the package itself.
    None,
    /// Repository is `<package>port`.
    Port,
}

impl UriSuffix {
    /// Resolve the suffix for `name` given which package is primary.
    pub fn for_package(name: &str, primary: &str) -> Self {
        if name == primary { Self::None } else { Self::Port }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Port => PORT_SUFFIX,
        }
    }
}

/// One entry of the package table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    name: String,
    suffix: UriSuffix,
}

impl PackageSpec {
    pub fn new(name: impl Into<String>, suffix: UriSuffix) -> Self {
        Self {
            name: name.into(),
            suffix,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn suffix(&self) -> UriSuffix {
        self.suffix
    }

    /// Repository segment of the request path: `<name><suffix>`.
    pub fn repository(&self) -> String {
        format!("{}{}", self.name, self.suffix.as_str())
    }
}

/// Ordered package list. Order is install order; entries are never sorted
/// or deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageTable {
    packages: Vec<PackageSpec>,
}

impl PackageTable {
    /// The built-in bootstrap set.
    pub fn bootstrap() -> Self {
        Self::with_primary(PRIMARY_PACKAGE, BOOT_PACKAGES)
    }

    /// Build a table from `names`, giving `primary` the empty suffix.
    pub fn with_primary(primary: &str, names: &[&str]) -> Self {
        let packages = names
            .iter()
            .map(|name| PackageSpec::new(*name, UriSuffix::for_package(name, primary)))
            .collect();
        Self { packages }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackageSpec> {
        self.packages.iter()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Package names in table order.
    pub fn names(&self) -> Vec<&str> {
        self.packages.iter().map(PackageSpec::name).collect()
    }
}

impl<'a> IntoIterator for &'a PackageTable {
    type Item = &'a PackageSpec;
    type IntoIter = std::slice::Iter<'a, PackageSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_has_empty_suffix() {
        let table = PackageTable::bootstrap();
        let primary = table.iter().find(|p| p.name() == PRIMARY_PACKAGE).unwrap();
        assert_eq!(primary.suffix(), UriSuffix::None);
        assert_eq!(primary.suffix().as_str(), "");
        assert_eq!(primary.repository(), "utils");
    }

    #[test]
    fn test_every_other_package_uses_port_suffix() {
        let table = PackageTable::bootstrap();
        for spec in table.iter().filter(|p| p.name() != PRIMARY_PACKAGE) {
            assert_eq!(spec.suffix().as_str(), "port", "{}", spec.name());
            assert_eq!(spec.repository(), format!("{}port", spec.name()));
        }
    }

    #[test]
    fn test_order_is_preserved() {
        let table = PackageTable::with_primary("primary", &["primary", "alpha", "beta"]);
        assert_eq!(table.names(), ["primary", "alpha", "beta"]);

        let suffixes: Vec<&str> = table.iter().map(|p| p.suffix().as_str()).collect();
        assert_eq!(suffixes, ["", "port", "port"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let table = PackageTable::with_primary("utils", &["curl", "utils", "curl"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.names(), ["curl", "utils", "curl"]);
    }

    #[test]
    fn test_primary_match_is_exact() {
        assert_eq!(UriSuffix::for_package("utils2", "utils"), UriSuffix::Port);
        assert_eq!(UriSuffix::for_package("Utils", "utils"), UriSuffix::Port);
    }
}
