//! Browser-based export using Web APIs

use wasm_bindgen::prelude::*;
use web_sys::{Blob, HtmlAnchorElement, Url};

use redpen_core::Review;

/// Download JSON as a file
#[wasm_bindgen]
pub fn download_json(filename: &str, json: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    let blob_parts = js_sys::Array::new();
    blob_parts.push(&JsValue::from_str(json));

    let blob_options = web_sys::BlobPropertyBag::new();
    blob_options.set_type("application/json");

    let blob = Blob::new_with_str_sequence_and_options(&blob_parts, &blob_options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    // Temporary anchor to trigger the download
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    Url::revoke_object_url(&url)?;

    Ok(())
}

/// Serialize a review and download it as `redpen-<id>.json`
pub fn export_review(review: &Review) -> Result<String, JsValue> {
    let json = redpen_core::to_json(review).map_err(|e| JsValue::from_str(&format!("{e:#}")))?;
    let filename = format!("redpen-{}.json", review.id);
    download_json(&filename, &json)?;
    Ok(filename)
}
