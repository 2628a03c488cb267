//! HTML snippets built from generator output.
//!
//! Uses [maud](https://maud.lambda.xyz/) so attribute values (URLs, alt
//! text) are escaped automatically. CSS passed to [`render_style`] is
//! trusted output of [`Rig::breakpoints`](crate::rig::Rig::breakpoints) and
//! is emitted as-is.

use maud::{Markup, PreEscaped, html};

use crate::types::Srcset;

/// `<img>` tag for a generated srcset.
///
/// `srcset` is omitted when there are no entries; `sizes` only when given.
pub fn render_img(srcset: &Srcset, alt: &str, sizes: Option<&str>) -> Markup {
    let set = (!srcset.srcset.is_empty()).then_some(srcset.srcset.as_str());
    html! {
        img src=(srcset.src) srcset=[set] sizes=[sizes] alt=(alt);
    }
}

/// `<style>` element wrapping generated media query CSS.
pub fn render_style(css: &str) -> Markup {
    html! {
        style { (PreEscaped(css)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Srcset {
        Srcset {
            src: "https://img/full".into(),
            srcset: "https://img/400 400w, https://img/full 1000w".into(),
        }
    }

    #[test]
    fn img_includes_src_and_srcset() {
        let html = render_img(&sample(), "Harbour at dawn", None).into_string();
        assert!(html.starts_with("<img"));
        assert!(html.contains(r#"src="https://img/full""#));
        assert!(html.contains(r#"srcset="https://img/400 400w, https://img/full 1000w""#));
        assert!(html.contains(r#"alt="Harbour at dawn""#));
        assert!(!html.contains("sizes="));
    }

    #[test]
    fn img_includes_sizes_when_given() {
        let html = render_img(&sample(), "", Some("(max-width: 800px) 100vw, 80vw")).into_string();
        assert!(html.contains(r#"sizes="(max-width: 800px) 100vw, 80vw""#));
    }

    #[test]
    fn img_omits_empty_srcset() {
        let set = Srcset {
            src: "https://img/full".into(),
            srcset: String::new(),
        };
        let html = render_img(&set, "x", None).into_string();
        assert!(!html.contains("srcset="));
    }

    #[test]
    fn img_escapes_attribute_values() {
        let set = Srcset {
            src: "https://img/full?a=1&b=2".into(),
            srcset: String::new(),
        };
        let html = render_img(&set, r#""><script>"#, None).into_string();
        assert!(html.contains("a=1&amp;b=2"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn style_keeps_css_unescaped() {
        let css = "@media (min-width: 400px) {\n  .a > b {\n  }\n}";
        let html = render_style(css).into_string();
        assert_eq!(html, format!("<style>{css}</style>"));
    }
}
