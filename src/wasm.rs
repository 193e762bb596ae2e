use crate::backtracking_search::{fill_template, SearchConfig};
use crate::heuristics::TieBreak;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen(start)]
pub fn initialize() {
    // Set the panic hook for better error messages
    crate::set_panic_hook();
}

/// Fetch a word list over the network, as text.
async fn fetch_text(url: &str) -> Result<String, JsError> {
    let window = web_sys::window().ok_or_else(|| JsError::new("No window available"))?;

    let response_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|_| JsError::new(&format!("Couldn't fetch word list from {url}")))?;
    let response: web_sys::Response = response_value
        .dyn_into()
        .map_err(|_| JsError::new("Fetch didn't return a response"))?;

    if !response.ok() {
        return Err(JsError::new("Network response was not OK"));
    }

    let text_promise = response
        .text()
        .map_err(|_| JsError::new("Couldn't read response body"))?;
    JsFuture::from(text_promise)
        .await
        .map_err(|_| JsError::new("Couldn't read response body"))?
        .as_string()
        .ok_or_else(|| JsError::new("Response body wasn't text"))
}

/// Fill a structure template and return the rendered grid, or `"No solution."` if it can't be
/// filled. The word list source is either an http(s) URL or the word list contents themselves.
#[wasm_bindgen]
pub async fn fill_grid(
    structure: &str,
    word_list_source: String,
    seed: Option<u64>,
    inference: Option<bool>,
) -> Result<String, JsError> {
    let words = if word_list_source.starts_with("http://")
        || word_list_source.starts_with("https://")
    {
        fetch_text(&word_list_source).await?
    } else {
        word_list_source
    };

    let config = SearchConfig {
        tie_break: seed.map_or(TieBreak::Stable, TieBreak::Seeded),
        inference: inference.unwrap_or(false),
    };

    let rendered = fill_template(structure, &words, config).map_err(|error| JsError::new(&error))?;

    Ok(rendered.unwrap_or_else(|| "No solution.".into()))
}
