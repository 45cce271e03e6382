//! Browser side of file exports: turning content into a download.
use contracts::shared::export::{build_csv, CsvExportable};
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Render `rows` as CSV and hand the file to the browser
pub fn export_csv<T: CsvExportable>(rows: &[T], filename: &str) -> Result<(), String> {
    let content = build_csv(rows).map_err(|e| e.to_string())?;
    let blob = text_blob(&content, "text/csv;charset=utf-8;")?;
    download_blob(&blob, filename)
}

fn text_blob(content: &str, mime: &str) -> Result<Blob, String> {
    let parts = js_sys::Array::new();
    parts.push(&wasm_bindgen::JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type(mime);

    Blob::new_with_str_sequence_and_options(&parts, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

/// Save raw bytes, e.g. a downloaded attachment
pub fn download_bytes(bytes: &[u8], mime: &str, filename: &str) -> Result<(), String> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));

    let properties = BlobPropertyBag::new();
    properties.set_type(mime);

    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))?;
    download_blob(&blob, filename)
}

/// Save `blob` under `filename` through a temporary anchor
pub fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;
    let body = document.body().ok_or("No body element")?;

    with_object_url(
        || {
            Url::create_object_url_with_blob(blob)
                .map_err(|e| format!("Failed to create object URL: {:?}", e))
        },
        |url| {
            let anchor = document
                .create_element("a")
                .map_err(|e| format!("Failed to create anchor: {:?}", e))?
                .dyn_into::<HtmlAnchorElement>()
                .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;
            anchor.set_href(url);
            anchor.set_download(filename);
            anchor
                .style()
                .set_property("display", "none")
                .map_err(|e| format!("Failed to set style: {:?}", e))?;

            body.append_child(&anchor)
                .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
            anchor.click();
            anchor.remove();
            Ok(())
        },
        |url| {
            if let Err(e) = Url::revoke_object_url(url) {
                log::warn!("object URL not revoked: {:?}", e);
            }
        },
    )
}

/// Run `use_url` against a fresh object URL; `revoke` runs on every path
/// once the URL exists.
fn with_object_url<T>(
    create: impl FnOnce() -> Result<String, String>,
    use_url: impl FnOnce(&str) -> Result<T, String>,
    revoke: impl FnOnce(&str),
) -> Result<T, String> {
    let url = create()?;
    let result = use_url(&url);
    revoke(&url);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_object_url_revoked_after_failure() {
        let revoked = RefCell::new(Vec::new());
        let result: Result<(), String> = with_object_url(
            || Ok("blob:1".to_string()),
            |_| Err("Failed to append anchor".to_string()),
            |url| revoked.borrow_mut().push(url.to_string()),
        );
        assert_eq!(result, Err("Failed to append anchor".to_string()));
        assert_eq!(*revoked.borrow(), vec!["blob:1".to_string()]);
    }

    #[test]
    fn test_object_url_revoked_after_success() {
        let revoked = RefCell::new(0);
        let result = with_object_url(
            || Ok("blob:2".to_string()),
            |url| Ok(url.len()),
            |_| *revoked.borrow_mut() += 1,
        );
        assert_eq!(result, Ok(6));
        assert_eq!(*revoked.borrow(), 1);
    }

    #[test]
    fn test_nothing_to_revoke_without_url() {
        let revoked = RefCell::new(0);
        let result: Result<(), String> = with_object_url(
            || Err("Failed to create object URL".to_string()),
            |_| Ok(()),
            |_| *revoked.borrow_mut() += 1,
        );
        assert!(result.is_err());
        assert_eq!(*revoked.borrow(), 0);
    }
}
