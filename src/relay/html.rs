//! HTML rewriting.
//!
//! Streams the document through `lol_html` and:
//! - rewrites `href`/`src`/`action` values into relay URLs
//! - rewrites every candidate URL of a `srcset` list
//! - prepends `<base href="<target>">` to `<head>`
//! - runs the text of `<style>` elements through the CSS rewriter
//!
//! Script bodies and inline `style` attributes are not touched. The transform
//! is one-pass: feeding its output back in double-encodes relay URLs.

use lol_html::html_content::ContentType;
use lol_html::{element, rewrite_str, text, RewriteStrSettings};

use crate::relay::css;
use crate::relay::policy::{RewriteContext, HTML_SKIP_PREFIXES, LINK_ATTRIBUTES, SRCSET_ATTRIBUTE};

/// Rewrite a whole HTML document. Never fails; on tokenizer errors the
/// document is returned unchanged.
pub fn rewrite(document: &str, ctx: &RewriteContext) -> String {
    let base_tag = format!("<base href=\"{}\">", ctx.base_url());
    let mut style_text = String::new();

    let mut handlers = Vec::with_capacity(LINK_ATTRIBUTES.len() + 3);

    for &attribute in LINK_ATTRIBUTES {
        handlers.push(element!(format!("[{attribute}]"), move |el| {
            if let Some(value) = el.get_attribute(attribute) {
                if let Some(rewritten) = ctx.rewrite_reference(&value, HTML_SKIP_PREFIXES) {
                    el.set_attribute(attribute, &rewritten)?;
                }
            }
            Ok(())
        }));
    }

    handlers.push(element!(format!("[{SRCSET_ATTRIBUTE}]"), move |el| {
        if let Some(value) = el.get_attribute(SRCSET_ATTRIBUTE) {
            el.set_attribute(SRCSET_ATTRIBUTE, &rewrite_srcset(&value, ctx))?;
        }
        Ok(())
    }));

    handlers.push(element!("head", |el| {
        el.prepend(&base_tag, ContentType::Html);
        Ok(())
    }));

    // Style text can arrive in several chunks; hold them back until the
    // last one so `url(` tokens are never split.
    handlers.push(text!("style", move |chunk| {
        style_text.push_str(chunk.as_str());
        if chunk.last_in_text_node() {
            let rewritten = css::rewrite(&style_text, ctx);
            chunk.replace(&rewritten, ContentType::Html);
            style_text.clear();
        } else {
            chunk.remove();
        }
        Ok(())
    }));

    let settings = RewriteStrSettings {
        element_content_handlers: handlers,
        // Ambiguous markup around text handlers is rewritten best-effort
        // instead of failing the whole document.
        strict: false,
        ..RewriteStrSettings::new()
    };

    match rewrite_str(document, settings) {
        Ok(rewritten) => rewritten,
        Err(err) => {
            tracing::warn!(error = %err, "HTML rewrite failed, relaying document unchanged");
            document.to_string()
        }
    }
}

/// Rewrite a `srcset` candidate list, keeping order and descriptors.
pub fn rewrite_srcset(value: &str, ctx: &RewriteContext) -> String {
    value
        .split(',')
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .map(|candidate| {
            let (url, descriptor) = match candidate.find(char::is_whitespace) {
                Some(split) => (&candidate[..split], candidate[split..].trim()),
                None => (candidate, ""),
            };
            let url = ctx
                .rewrite_reference(url, HTML_SKIP_PREFIXES)
                .unwrap_or_else(|| url.to_string());
            if descriptor.is_empty() {
                url
            } else {
                format!("{url} {descriptor}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
