//! Column descriptors supplied by the dataset layer

use std::fmt;

use serde::{Deserialize, Serialize};

/// Column data type, using the platform's type names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "SingleLine.Text")]
    Text,
    #[serde(rename = "SingleLine.Email")]
    Email,
    #[serde(rename = "SingleLine.Phone")]
    Phone,
    #[serde(rename = "SingleLine.URL")]
    Url,
    #[serde(rename = "Multiple")]
    MultilineText,
    #[serde(rename = "Whole.None")]
    WholeNumber,
    #[serde(rename = "Decimal")]
    Decimal,
    #[serde(rename = "FP")]
    FloatingPoint,
    #[serde(rename = "Currency")]
    Currency,
    #[serde(rename = "DateAndTime.DateOnly")]
    DateOnly,
    #[serde(rename = "DateAndTime.DateAndTime")]
    DateAndTime,
    #[serde(rename = "OptionSet")]
    OptionSet,
    #[serde(rename = "TwoOptions")]
    TwoOptions,
    #[serde(rename = "MultiSelectPicklist")]
    MultiSelectOptionSet,
    #[serde(rename = "Lookup.Simple")]
    Lookup,
    #[serde(rename = "Lookup.Customer")]
    Customer,
    #[serde(rename = "Lookup.Owner")]
    Owner,
    #[serde(rename = "Lookup.Regarding")]
    Regarding,
    #[serde(rename = "File")]
    File,
    #[serde(rename = "Image")]
    Image,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "SingleLine.Text",
            Self::Email => "SingleLine.Email",
            Self::Phone => "SingleLine.Phone",
            Self::Url => "SingleLine.URL",
            Self::MultilineText => "Multiple",
            Self::WholeNumber => "Whole.None",
            Self::Decimal => "Decimal",
            Self::FloatingPoint => "FP",
            Self::Currency => "Currency",
            Self::DateOnly => "DateAndTime.DateOnly",
            Self::DateAndTime => "DateAndTime.DateAndTime",
            Self::OptionSet => "OptionSet",
            Self::TwoOptions => "TwoOptions",
            Self::MultiSelectOptionSet => "MultiSelectPicklist",
            Self::Lookup => "Lookup.Simple",
            Self::Customer => "Lookup.Customer",
            Self::Owner => "Lookup.Owner",
            Self::Regarding => "Lookup.Regarding",
            Self::File => "File",
            Self::Image => "Image",
        }
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup | Self::Customer | Self::Owner | Self::Regarding)
    }

    pub fn is_whole_number(&self) -> bool {
        matches!(self, Self::WholeNumber)
    }

    /// Columns backed by a secondary text field searched by pattern operators
    pub fn has_name_shadow(&self) -> bool {
        self.is_lookup() || matches!(self, Self::OptionSet | Self::TwoOptions)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One choice of an option set column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub value: i32,
    pub label: String,
}

/// Type-specific column metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionItem>,
    /// Lookup target entity names, probed in this order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
    #[serde(default)]
    pub multiline: bool,
}

/// Grid column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Attribute name, `alias.attribute` for joined columns
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub metadata: ColumnMetadata,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            metadata: ColumnMetadata::default(),
        }
    }

    pub fn with_options<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (i32, &'static str)>,
    {
        self.metadata.options = options
            .into_iter()
            .map(|(value, label)| OptionItem {
                value,
                label: label.to_string(),
            })
            .collect();
        self
    }

    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Entity alias of a joined column
    pub fn entity_alias(&self) -> Option<&str> {
        self.name.split_once('.').map(|(alias, _)| alias)
    }

    /// Attribute name without the entity alias
    pub fn attribute_name(&self) -> &str {
        self.name
            .split_once('.')
            .map(|(_, attribute)| attribute)
            .unwrap_or(&self.name)
    }

    /// Canonical `alias.attribute` or bare attribute name
    pub fn alias(&self) -> &str {
        &self.name
    }

    pub fn has_option(&self, value: i32) -> bool {
        self.metadata.options.iter().any(|o| o.value == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_joined_column_names() {
        let column = Column::new("acc.owner", DataType::Owner);
        assert_eq!(column.entity_alias(), Some("acc"));
        assert_eq!(column.attribute_name(), "owner");
        assert_eq!(column.alias(), "acc.owner");

        let column = Column::new("owner", DataType::Owner);
        assert_eq!(column.entity_alias(), None);
        assert_eq!(column.attribute_name(), "owner");
    }

    #[test]
    fn test_data_type_serde() {
        let column: Column = serde_json::from_value(json!({
            "name": "statuscode",
            "dataType": "OptionSet",
            "metadata": {"options": [{"value": 1, "label": "Active"}]}
        }))
        .unwrap();
        assert_eq!(column.data_type, DataType::OptionSet);
        assert!(column.has_option(1));
        assert!(!column.has_option(2));

        let value = serde_json::to_value(DataType::DateOnly).unwrap();
        assert_eq!(value, json!("DateAndTime.DateOnly"));
        assert_eq!(DataType::DateOnly.to_string(), "DateAndTime.DateOnly");
    }

    #[test]
    fn test_name_shadow_types() {
        assert!(DataType::Owner.has_name_shadow());
        assert!(DataType::TwoOptions.has_name_shadow());
        assert!(!DataType::MultiSelectOptionSet.has_name_shadow());
        assert!(!DataType::Text.has_name_shadow());
    }
}
