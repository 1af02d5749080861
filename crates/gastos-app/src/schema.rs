// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::model::{SortDirection, SortField};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub field: SortField,
    pub label: String,
    pub sortable: bool,
    pub filter_options: Vec<FilterOption>,
    pub default_sort: Option<SortDirection>,
}

// Recomputed on every draw; the category list is externally owned.
pub fn column_schema(categories: &[String]) -> Vec<ColumnDescriptor> {
    SortField::ALL
        .iter()
        .map(|&field| ColumnDescriptor {
            field,
            label: field.label().to_owned(),
            sortable: true,
            filter_options: match field {
                SortField::Category => categories
                    .iter()
                    .map(|category| FilterOption {
                        label: category.clone(),
                        value: category.clone(),
                    })
                    .collect(),
                _ => Vec::new(),
            },
            default_sort: match field {
                SortField::Date => Some(SortDirection::Desc),
                _ => None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::column_schema;
    use crate::model::{SortDirection, SortField};

    #[test]
    fn schema_has_four_sortable_columns() {
        let columns = column_schema(&[]);
        let fields: Vec<SortField> = columns.iter().map(|c| c.field).collect();
        assert_eq!(
            fields,
            [
                SortField::Title,
                SortField::Amount,
                SortField::Category,
                SortField::Date,
            ]
        );
        assert!(columns.iter().all(|c| c.sortable));
    }

    #[test]
    fn category_column_lists_options_in_input_order() {
        let categories = vec!["Food".to_owned(), "Travel".to_owned()];
        let columns = column_schema(&categories);
        let category = columns
            .iter()
            .find(|c| c.field == SortField::Category)
            .expect("category column");
        let values: Vec<&str> = category
            .filter_options
            .iter()
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(values, ["Food", "Travel"]);
        assert!(
            category
                .filter_options
                .iter()
                .all(|o| o.label == o.value)
        );
        for column in &columns {
            if column.field != SortField::Category {
                assert!(column.filter_options.is_empty());
            }
        }
    }

    #[test]
    fn missing_category_list_yields_no_filter_options() {
        let columns = column_schema(&[]);
        assert!(columns.iter().all(|c| c.filter_options.is_empty()));
    }

    #[test]
    fn only_the_date_column_declares_a_default_order() {
        for column in column_schema(&[]) {
            if column.field == SortField::Date {
                assert_eq!(column.default_sort, Some(SortDirection::Desc));
            } else {
                assert_eq!(column.default_sort, None);
            }
        }
    }
}
