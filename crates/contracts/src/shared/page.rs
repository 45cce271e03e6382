use serde::{Deserialize, Serialize};

/// One page of a server-side paginated listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default = "default_total_pages")]
    pub total_pages: usize,
    #[serde(default)]
    pub total_elements: usize,
}

fn default_total_pages() -> usize {
    1
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_pages: 1,
            total_elements: 0,
        }
    }
}

/// Query string of a paginated request; `page` is zero-based
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageQuery {
    pub page: usize,
    pub size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let page: Page<i64> = serde_json::from_str("{}").unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_elements, 0);
    }

    #[test]
    fn test_camel_case_wire_names() {
        let page: Page<i64> =
            serde_json::from_str(r#"{"content":[1,2],"totalPages":3,"totalElements":30}"#).unwrap();
        assert_eq!(page.content, vec![1, 2]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_elements, 30);
    }
}
