//! Redpen Web - WebAssembly version of the correction viewer
//!
//! Exposes the diff and highlighting engines to a JavaScript host, and
//! renders the viewer in the DOM with Ratzilla.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::Terminal;
use ratzilla::{event::KeyCode, DomBackend, WebRenderer};
use wasm_bindgen::prelude::*;

use redpen_core::{service, App, Correction, Dialect, Document, Mode, ParseEnumError, Review, Tone};

pub mod io;
mod ui;

const SAMPLE_ORIGINAL: &str =
    "<p>Their are to many cats in the garden, and <b>none of them</b> is mine.</p>";

const SAMPLE_RESPONSE: &str = r#"{
  "rewrittenText": "<p>There are too many cats in the garden, and <b>none of them</b> are mine.</p>",
  "feedback": "Watch homophones such as their/there and to/too.",
  "corrections": [
    {"original": "Their", "correction": "There", "type": "grammar",
     "explanation": "'There' introduces the existence of something.",
     "examples": ["There is a cat on the wall."]},
    {"original": "to", "correction": "too", "type": "spelling",
     "explanation": "'Too' means 'excessively'."},
    {"original": "is", "correction": "are", "type": "grammar",
     "explanation": "Agreement with a plural reading of 'none'."}
  ]
}"#;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"Redpen WASM initialized".into());
}

/// Word diff of two HTML fragments as `{ originalSegments, correctedSegments }`
#[wasm_bindgen]
pub fn compute_diff(original_html: &str, corrected_html: &str) -> Result<String, JsValue> {
    let diff = redpen_core::diff_html(original_html, corrected_html);
    serde_json::to_string(&diff).map_err(js_error)
}

/// Wrap corrections (a JSON array) in marker spans inside `html`
#[wasm_bindgen]
pub fn highlight_corrections(html: &str, corrections_json: &str) -> Result<String, JsValue> {
    let corrections: Vec<Correction> = serde_json::from_str(corrections_json).map_err(js_error)?;
    Ok(redpen_core::highlight_corrections_in_html(html, &corrections))
}

#[wasm_bindgen]
pub fn extract_plain_text(html: &str) -> String {
    Document::parse(html).plain_text()
}

/// User-facing message for a failed service call
#[wasm_bindgen]
pub fn classify_failure(status: u16, body: &str) -> String {
    service::classify_failure(status, body).to_string()
}

/// Tone and dialect the text was submitted with; absent values take defaults
fn parse_settings(
    tone: Option<&str>,
    dialect: Option<&str>,
) -> Result<(Tone, Dialect), ParseEnumError> {
    let tone = tone.map(str::parse::<Tone>).transpose()?.unwrap_or_default();
    let dialect = dialect.map(str::parse::<Dialect>).transpose()?.unwrap_or_default();
    Ok((tone, dialect))
}

/// Render the viewer for a submitted text and the service reply to it.
///
/// `tone` and `dialect` accept short names (`email`, `american`) or the full
/// labels sent to the service.
#[wasm_bindgen]
pub fn mount(
    original_html: &str,
    response_json: &str,
    tone: Option<String>,
    dialect: Option<String>,
) -> Result<(), JsValue> {
    let (tone, dialect) = parse_settings(tone.as_deref(), dialect.as_deref()).map_err(js_error)?;
    let response = service::parse_response(200, response_json).map_err(js_error)?;
    run(Review::new(original_html.to_string(), tone, dialect, response))
}

/// Render the viewer with a built-in sample review
#[wasm_bindgen]
pub fn mount_demo() -> Result<(), JsValue> {
    mount(SAMPLE_ORIGINAL, SAMPLE_RESPONSE, None, None)
}

fn run(review: Review) -> Result<(), JsValue> {
    let mut app = App::new();
    app.load_review(review);
    app.set_status("Welcome to Redpen! Press 'v' to switch views, '?' for help");

    let app_state = Rc::new(RefCell::new(app));

    let backend = DomBackend::new()
        .map_err(|e| JsValue::from_str(&format!("Failed to create backend: {:?}", e)))?;
    let mut terminal = Terminal::new(backend)
        .map_err(|e| JsValue::from_str(&format!("Failed to create terminal: {:?}", e)))?;

    terminal.on_key_event({
        let app_state_cloned = app_state.clone();
        move |event| {
            let mut app = app_state_cloned.borrow_mut();
            app.clear_status();

            match app.mode {
                Mode::Normal => handle_normal_mode(&mut app, event.code),
                Mode::Detail | Mode::Help => app.close_popup(),
            }
        }
    });

    terminal.draw_web(move |frame| {
        let app = app_state.borrow();
        ui::draw(frame, &app);
    });

    Ok(())
}

fn handle_normal_mode(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('?') => app.mode = Mode::Help,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') => app.scroll_to_top(),
        KeyCode::Char(']') => app.next_correction(),
        KeyCode::Char('[') => app.prev_correction(),
        KeyCode::Tab => app.toggle_focus(),

        KeyCode::Char('v') => app.toggle_view(),
        KeyCode::Enter => app.open_detail(),

        // Export
        KeyCode::Char('e') => {
            let result = match &app.review {
                Some(review) => io::export_review(review),
                None => Err(JsValue::from_str("No review loaded")),
            };
            match result {
                Ok(filename) => app.set_status(&format!("Exported to {filename}")),
                Err(e) => app.set_status(&format!("Export failed: {:?}", e)),
            }
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_review_places_every_correction() {
        let response = service::parse_response(200, SAMPLE_RESPONSE).unwrap();
        let review = Review::new(SAMPLE_ORIGINAL.to_string(), Tone::Chat, Dialect::British, response);
        // "are" is claimed at its first occurrence, before "too"
        assert_eq!(review.analyze().placed, vec![0, 2, 1]);
    }

    #[test]
    fn test_parse_settings() {
        assert_eq!(
            parse_settings(Some("email"), Some("American")),
            Ok((Tone::Email, Dialect::American))
        );
        assert_eq!(parse_settings(None, None), Ok((Tone::Original, Dialect::British)));
        assert_eq!(
            parse_settings(Some("Chat (Casual/WhatsApp)"), None),
            Ok((Tone::Chat, Dialect::British))
        );
        assert!(parse_settings(None, Some("canadian")).is_err());
    }

    #[test]
    fn test_extract_plain_text() {
        assert_eq!(extract_plain_text("<p>a <b>b</b></p>"), "a b");
    }

    #[test]
    fn test_classify_failure_messages() {
        assert_eq!(
            classify_failure(429, ""),
            "Rate limit exceeded. Please try again later."
        );
        assert_eq!(classify_failure(500, r#"{"error":"boom"}"#), "boom");
        assert_eq!(classify_failure(502, "gateway"), "HTTP 502");
    }
}
