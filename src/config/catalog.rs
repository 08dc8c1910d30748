//! Server and product lookup tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named, ordered set of product ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductGroup {
    pub name: String,
    #[serde(default)]
    pub products: Vec<i64>,
}

/// Known servers (submission contexts), products and product groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub servers: BTreeMap<i64, String>,
    pub products: BTreeMap<i64, String>,
    pub product_groups: Vec<ProductGroup>,
}

impl Catalog {
    /// Build from config tables whose keys are stringified ids.
    /// Keys that are not integers are skipped with a warning.
    pub fn from_tables(
        servers: &BTreeMap<String, String>,
        products: &BTreeMap<String, String>,
        product_groups: &[ProductGroup],
    ) -> Self {
        Self {
            servers: parse_keys("servers", servers),
            products: parse_keys("products", products),
            product_groups: product_groups.to_vec(),
        }
    }

    pub fn server_name(&self, id: i64) -> Option<&str> {
        self.servers.get(&id).map(|s| s.as_str())
    }

    pub fn product_name(&self, id: i64) -> Option<&str> {
        self.products.get(&id).map(|s| s.as_str())
    }

    /// Whether `id` is an acceptable server. Every id is accepted when no
    /// server table is configured.
    pub fn is_known_server(&self, id: i64) -> bool {
        self.servers.is_empty() || self.servers.contains_key(&id)
    }

    /// Look up a group by name (case-insensitive).
    pub fn group(&self, name: &str) -> Option<&ProductGroup> {
        self.product_groups
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// Groups in configured order, each with its named products only.
    /// Groups left with no named products are omitted.
    pub fn groups(&self) -> Vec<(&str, Vec<(i64, &str)>)> {
        self.product_groups
            .iter()
            .filter_map(|group| {
                let products: Vec<(i64, &str)> = group
                    .products
                    .iter()
                    .filter_map(|id| self.product_name(*id).map(|name| (*id, name)))
                    .collect();
                if products.is_empty() {
                    None
                } else {
                    Some((group.name.as_str(), products))
                }
            })
            .collect()
    }

    /// `"Name (id)"` label for a server, or the bare id.
    pub fn server_label(&self, id: i64) -> String {
        match self.server_name(id) {
            Some(name) => format!("{} ({})", name, id),
            None => id.to_string(),
        }
    }

    /// `"Name (id)"` label for a product, or the bare id.
    pub fn product_label(&self, id: i64) -> String {
        match self.product_name(id) {
            Some(name) => format!("{} ({})", name, id),
            None => id.to_string(),
        }
    }
}

fn parse_keys(table: &str, raw: &BTreeMap<String, String>) -> BTreeMap<i64, String> {
    raw.iter()
        .filter_map(|(key, name)| match key.trim().parse::<i64>() {
            Ok(id) => Some((id, name.clone())),
            Err(_) => {
                tracing::warn!("Ignoring non-numeric key '{}' in [{}]", key, table);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_tables_skips_bad_keys() {
        let catalog = Catalog::from_tables(
            &raw(&[("0", "Magnates"), ("x", "Broken")]),
            &BTreeMap::new(),
            &[],
        );
        assert_eq!(catalog.servers.len(), 1);
        assert_eq!(catalog.server_label(0), "Magnates (0)");
        assert_eq!(catalog.server_label(5), "5");
    }

    #[test]
    fn test_groups_keep_order_and_skip_empty() {
        let catalog = Catalog::from_tables(
            &BTreeMap::new(),
            &raw(&[("1", "Seeds"), ("3", "Power")]),
            &[
                ProductGroup {
                    name: "Utilities".to_string(),
                    products: vec![3],
                },
                ProductGroup {
                    name: "Unknown".to_string(),
                    products: vec![99],
                },
                ProductGroup {
                    name: "Farm".to_string(),
                    products: vec![1, 2],
                },
            ],
        );
        let groups = catalog.groups();
        let names: Vec<&str> = groups.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["Utilities", "Farm"]);
        assert_eq!(groups[1].1, vec![(1, "Seeds")]);
        assert!(catalog.group("farm").is_some());
    }
}
