//! Column Discovery Module
//! Maps semantic roles onto inconsistently named CSV headers.

use crate::data::LoadError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Semantic column roles of a presale price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Region,
    SizeCategory,
    Year,
    Month,
    Price,
}

impl Role {
    /// Roles in discovery order.
    pub const ALL: [Role; 5] = [
        Role::Region,
        Role::SizeCategory,
        Role::Year,
        Role::Month,
        Role::Price,
    ];

    /// Header substrings accepted for this role (case-sensitive).
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Role::Region => &["지역", "시도", "city"],
            Role::SizeCategory => &["규모", "면적", "size"],
            Role::Year => &["연도", "year"],
            Role::Month => &["월", "month"],
            Role::Price => &["분양가격", "가격", "price"],
        }
    }

    /// Only the size category may be absent from a source.
    pub fn is_essential(self) -> bool {
        !matches!(self, Role::SizeCategory)
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Region => "region",
            Role::SizeCategory => "size-category",
            Role::Year => "year",
            Role::Month => "month",
            Role::Price => "price",
        }
    }

    fn matches(self, header: &str) -> bool {
        self.synonyms().iter().any(|s| header.contains(s))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A discovered column: its position in the raw table and its trimmed header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedColumn {
    pub index: usize,
    pub header: String,
}

/// Role → column mapping, built once per load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    columns: BTreeMap<Role, MappedColumn>,
}

impl ColumnMapping {
    /// Match every role against `headers` (trimmed first). The first header in
    /// column order containing one of a role's synonyms wins.
    pub fn discover<S: AsRef<str>>(headers: &[S]) -> Result<Self, LoadError> {
        let trimmed: Vec<String> = headers.iter().map(|h| h.as_ref().trim().to_string()).collect();

        let columns: BTreeMap<Role, MappedColumn> = Role::ALL
            .iter()
            .filter_map(|&role| {
                trimmed
                    .iter()
                    .position(|h| role.matches(h))
                    .map(|index| {
                        (
                            role,
                            MappedColumn {
                                index,
                                header: trimmed[index].clone(),
                            },
                        )
                    })
            })
            .collect();

        let missing: Vec<Role> = Role::ALL
            .iter()
            .copied()
            .filter(|role| role.is_essential() && !columns.contains_key(role))
            .collect();

        if !missing.is_empty() {
            return Err(LoadError::Schema {
                missing,
                headers: trimmed,
            });
        }

        Ok(Self { columns })
    }

    pub fn get(&self, role: Role) -> Option<&MappedColumn> {
        self.columns.get(&role)
    }

    pub fn header(&self, role: Role) -> Option<&str> {
        self.get(role).map(|c| c.header.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &MappedColumn)> {
        self.columns.iter().map(|(role, col)| (*role, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_korean_headers() {
        let headers = ["지역명", "규모구분", "연도", "월", "분양가격(㎡)"];
        let mapping = ColumnMapping::discover(&headers).unwrap();
        assert_eq!(mapping.header(Role::Region), Some("지역명"));
        assert_eq!(mapping.header(Role::SizeCategory), Some("규모구분"));
        assert_eq!(mapping.header(Role::Year), Some("연도"));
        assert_eq!(mapping.header(Role::Month), Some("월"));
        assert_eq!(mapping.header(Role::Price), Some("분양가격(㎡)"));
        assert_eq!(mapping.get(Role::Price).unwrap().index, 4);
    }

    #[test]
    fn trims_headers_before_matching() {
        let headers = ["  city ", "year", " month", "price  "];
        let mapping = ColumnMapping::discover(&headers).unwrap();
        assert_eq!(mapping.header(Role::Region), Some("city"));
        assert_eq!(mapping.header(Role::Price), Some("price"));
        assert_eq!(mapping.get(Role::SizeCategory), None);
    }

    #[test]
    fn first_matching_header_wins() {
        let headers = ["시도", "지역코드", "year", "month", "가격", "price"];
        let mapping = ColumnMapping::discover(&headers).unwrap();
        assert_eq!(mapping.header(Role::Region), Some("시도"));
        assert_eq!(mapping.header(Role::Price), Some("가격"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let headers = ["City", "Year", "Month", "Price"];
        match ColumnMapping::discover(&headers) {
            Err(LoadError::Schema { missing, headers }) => {
                assert_eq!(missing, vec![Role::Region, Role::Year, Role::Month, Role::Price]);
                assert_eq!(headers, vec!["City", "Year", "Month", "Price"]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn missing_price_lists_found_headers() {
        let headers = ["지역명", "연도", "월"];
        let err = ColumnMapping::discover(&headers).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("price"), "{message}");
        assert!(message.contains("지역명"), "{message}");
    }
}
