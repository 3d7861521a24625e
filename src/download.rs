//! Hands exported bytes to the user as a file.
//!
//! Native builds write into the configured output directory. Web builds create a
//! Blob URL and click a temporary anchor carrying the `download` attribute.

use std::path::Path;

use crate::error::SketchError;

/// Writes the exported file into `output_dir`, creating the directory if needed
///
/// Args:
///     file_name (&str): Fixed name such as `drawing.png`
///     bytes (&[u8]): Encoded file contents
///     output_dir (&Path): Target directory
///
/// Returns:
///     Result<(), SketchError>: Io errors from creating the directory or writing the file
#[cfg(not(target_arch = "wasm32"))]
pub fn deliver(
    file_name: &str,
    _mime_type: &str,
    bytes: &[u8],
    output_dir: &Path,
) -> Result<(), SketchError> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name);
    std::fs::write(&path, bytes)?;
    log::info!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Starts a browser download of the exported file
#[cfg(target_arch = "wasm32")]
pub fn deliver(
    file_name: &str,
    mime_type: &str,
    bytes: &[u8],
    _output_dir: &Path,
) -> Result<(), SketchError> {
    use eframe::wasm_bindgen::{JsCast as _, JsValue};

    fn js_err(err: JsValue) -> SketchError {
        SketchError::Download(format!("{:?}", err))
    }

    let window = web_sys::window().ok_or_else(|| SketchError::Download("no window".to_owned()))?;
    let document = window
        .document()
        .ok_or_else(|| SketchError::Download("no document".to_owned()))?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(js_err)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)?;

    let anchor = document
        .create_element("a")
        .map_err(js_err)?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| SketchError::Download("not an anchor element".to_owned()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    web_sys::Url::revoke_object_url(&url).map_err(js_err)?;
    log::info!("Downloaded {} ({} bytes)", file_name, bytes.len());
    Ok(())
}
