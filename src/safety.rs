// SPDX-License-Identifier: MPL-2.0
//! Resource safety policy and icon markup sanitizing.
//!
//! Every built-in handler validates its resource URI here before use, and
//! any markup fragment supplied as a toolbar icon passes through
//! [`sanitize_icon_markup`] before it reaches the stage.

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

/// Schemes acceptable for a download target.
const DOWNLOAD_SCHEMES: &[&str] = &["http", "https", "blob"];

/// data-URI media types loadable on the stage.
const DATA_MEDIA_PREFIXES: &[&str] = &["image/", "video/", "audio/"];

/// Returns true if the URI may be loaded as a media resource.
///
/// Allowed: http(s), blob, a same-document-relative reference, or a
/// data-URI whose declared MIME type is image/*, video/*, audio/* or
/// application/pdf.
#[must_use]
pub fn is_safe_media_uri(uri: &str) -> bool {
    let uri = strip_control_chars(uri);
    let uri = uri.trim();
    if uri.is_empty() {
        return false;
    }

    match scheme_of(uri) {
        None => true, // same-document-relative reference
        Some(scheme) => match scheme.as_str() {
            "http" | "https" | "blob" => true,
            "data" => data_uri_mime(uri).is_some_and(|mime| {
                DATA_MEDIA_PREFIXES.iter().any(|p| mime.starts_with(p))
                    || mime == "application/pdf"
            }),
            _ => false,
        },
    }
}

/// Returns true if the URI may be offered as a download target.
///
/// Stricter than the media policy: only http(s) and blob qualify.
#[must_use]
pub fn is_safe_download_uri(uri: &str) -> bool {
    let uri = strip_control_chars(uri);
    let uri = uri.trim();
    if uri.is_empty() {
        return false;
    }

    scheme_of(uri).is_some_and(|scheme| DOWNLOAD_SCHEMES.contains(&scheme.as_str()))
}

/// Extracts the URI scheme, lowercased, if one is present.
///
/// A colon appearing after `/`, `?` or `#`, or a prefix that is not a valid
/// scheme token, means the reference is relative.
fn scheme_of(uri: &str) -> Option<String> {
    let colon = uri.find(':')?;
    let prefix = &uri[..colon];
    if prefix.is_empty() {
        return None;
    }
    if prefix.contains(['/', '?', '#']) {
        return None;
    }
    let mut chars = prefix.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    Some(prefix.to_ascii_lowercase())
}

/// Returns the declared MIME type of a data-URI, lowercased.
fn data_uri_mime(uri: &str) -> Option<String> {
    let rest = &uri[uri.find(':')? + 1..];
    let end = rest.find([';', ','])?;
    let mime = rest[..end].trim();
    if mime.is_empty() {
        None
    } else {
        Some(mime.to_ascii_lowercase())
    }
}

/// Removes ASCII control characters, which browsers ignore inside URI
/// schemes and which would otherwise defeat prefix checks.
fn strip_control_chars(uri: &str) -> String {
    uri.chars().filter(|c| !c.is_ascii_control()).collect()
}

/// Returns true when an attribute value carries a script scheme.
fn is_script_scheme(value: &str) -> bool {
    let cleaned = strip_control_chars(value);
    let cleaned = cleaned.trim().to_ascii_lowercase();
    cleaned.starts_with("javascript:") || cleaned.starts_with("vbscript:")
}

/// Sanitizes a markup fragment supplied as a toolbar icon.
///
/// Script elements are removed with their subtrees, all `on*` attributes
/// are stripped, and script-scheme `href`/`xlink:href` values are rewritten
/// to `#`. Comments, processing instructions and doctype declarations are
/// dropped. A fragment that fails to parse sanitizes to the empty string.
#[must_use]
pub fn sanitize_icon_markup(fragment: &str) -> String {
    let mut reader = Reader::from_str(fragment);
    reader.config_mut().check_end_names = false;

    let mut writer = Writer::new(Vec::new());
    // Depth of the currently skipped script subtree, if any.
    let mut skip_depth: usize = 0;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if skip_depth > 0 || is_script_element(e.name().as_ref()) {
                    skip_depth += 1;
                    continue;
                }
                let Some(cleaned) = sanitize_start(&e) else {
                    return String::new();
                };
                if writer.write_event(Event::Start(cleaned)).is_err() {
                    return String::new();
                }
            }
            Ok(Event::Empty(e)) => {
                if skip_depth > 0 || is_script_element(e.name().as_ref()) {
                    continue;
                }
                let Some(cleaned) = sanitize_start(&e) else {
                    return String::new();
                };
                if writer.write_event(Event::Empty(cleaned)).is_err() {
                    return String::new();
                }
            }
            Ok(Event::End(e)) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                    continue;
                }
                if writer.write_event(Event::End(e)).is_err() {
                    return String::new();
                }
            }
            Ok(Event::Text(e)) => {
                if skip_depth == 0 && writer.write_event(Event::Text(e)).is_err() {
                    return String::new();
                }
            }
            Ok(Event::CData(e)) => {
                if skip_depth == 0 && writer.write_event(Event::CData(e)).is_err() {
                    return String::new();
                }
            }
            // Comments, PIs, declarations and doctypes never survive.
            Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {}
            Ok(Event::GeneralRef(_)) => {}
            Ok(Event::Eof) => break,
            Err(err) => {
                tracing::warn!(error = %err, "rejecting unparseable icon markup");
                return String::new();
            }
        }
    }

    String::from_utf8(writer.into_inner()).unwrap_or_default()
}

fn is_script_element(name: &[u8]) -> bool {
    name.eq_ignore_ascii_case(b"script")
}

/// Rebuilds a start tag with event handler attributes stripped and
/// script-scheme link targets neutralized.
fn sanitize_start<'a>(e: &BytesStart<'a>) -> Option<BytesStart<'a>> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut cleaned = BytesStart::new(name);

    for attr in e.attributes().with_checks(false) {
        let attr = attr.ok()?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if key.to_ascii_lowercase().starts_with("on") {
            continue;
        }

        let value = String::from_utf8_lossy(&attr.value).into_owned();
        let is_link = {
            let lower = key.to_ascii_lowercase();
            lower == "href" || lower == "xlink:href"
        };
        if is_link && is_script_scheme(&value) {
            cleaned.push_attribute((key.as_str(), "#"));
        } else {
            cleaned.push_attribute((key.as_str(), value.as_str()));
        }
    }

    Some(cleaned)
}
