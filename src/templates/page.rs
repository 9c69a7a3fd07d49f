use std::path::Path;

use crate::ui::{escape_html, SlotState};

/// Content of the page's dynamic regions.
pub struct PageView<'a> {
    pub url: &'a str,
    pub result: SlotState,
    pub features: SlotState,
}

impl PageView<'_> {
    pub fn empty() -> Self {
        let hidden = SlotState {
            html: String::new(),
            hidden: true,
        };
        PageView {
            url: "",
            result: hidden.clone(),
            features: hidden,
        }
    }
}

/// Landing page: `index.html` from the static dir when present, otherwise the
/// built-in page with empty result regions.
pub fn landing(static_dir: Option<&Path>) -> String {
    if let Some(dir) = static_dir {
        if let Ok(contents) = std::fs::read_to_string(dir.join("index.html")) {
            return contents;
        }
    }
    render(&PageView::empty())
}

fn class_attr(base: &str, slot: &SlotState) -> String {
    if slot.hidden {
        format!("{} hidden", base).trim().to_string()
    } else {
        base.to_string()
    }
}

pub fn render(view: &PageView) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>phishguard: URL risk check</title>
    <style>
        *, *::before, *::after {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
            background: #f7f8fa; color: #111827; min-height: 100vh;
        }}
        .page {{ max-width: 720px; margin: 0 auto; padding: 3rem 1.25rem 4rem; }}
        h1 {{ font-size: 1.5rem; margin-bottom: 1rem; }}
        form {{ display: flex; gap: 0.5rem; margin-bottom: 1rem; }}
        input {{ flex: 1; padding: 0.6rem 0.75rem; border: 1px solid #d8dce3; border-radius: 6px; }}
        button {{ padding: 0.6rem 1rem; border: 0; border-radius: 6px; background: #2563eb; color: #fff; cursor: pointer; }}
        .hidden {{ display: none; }}
        #result {{ background: #fff; border: 1px solid #e8ebf0; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; }}
        .badge {{ display: inline-block; padding: 0.2rem 0.6rem; border-radius: 9999px; font-size: 0.8rem; font-weight: 600; margin-right: 0.5rem; }}
        .badge.phish {{ background: #fef2f2; color: #dc2626; border: 1px solid #fecaca; }}
        .badge.safe {{ background: #f0fdf4; color: #16a34a; border: 1px solid #bbf7d0; }}
        .muted {{ color: #6b7280; }}
        .small {{ font-size: 0.8rem; margin-top: 0.5rem; }}
        .grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(160px, 1fr)); gap: 0.5rem; }}
        .feature {{ background: #fff; border: 1px solid #e8ebf0; border-radius: 6px; padding: 0.6rem; }}
        .feature h4 {{ font-size: 0.75rem; color: #4b5563; font-weight: 500; }}
        .feature .value {{ font-family: Menlo, monospace; font-size: 0.9rem; }}
    </style>
</head>
<body>
    <div class="page">
        <h1>Phishing URL check</h1>
        <form method="get" action="/check">
            <input id="urlInput" name="url" type="text" placeholder="https://example.com/login" value="{url}" autofocus>
            <button id="checkBtn" type="submit">Check</button>
        </form>
        <div id="result" class="{result_class}">{result}</div>
        <div id="features" class="{features_class}">{features}</div>
    </div>
</body>
</html>"#,
        url = escape_html(view.url),
        result_class = class_attr("", &view.result),
        result = view.result.html,
        features_class = class_attr("grid", &view.features),
        features = view.features.html,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page_hides_both_regions() {
        let html = render(&PageView::empty());
        assert!(html.contains(r#"<div id="result" class="hidden"></div>"#));
        assert!(html.contains(r#"<div id="features" class="grid hidden"></div>"#));
        assert!(html.contains(r#"id="urlInput""#));
        assert!(html.contains(r#"id="checkBtn""#));
    }

    #[test]
    fn input_value_is_escaped() {
        let view = PageView {
            url: r#""><script>"#,
            ..PageView::empty()
        };
        let html = render(&view);
        assert!(html.contains(r#"value="&quot;&gt;&lt;script&gt;""#));
    }

    #[test]
    fn landing_serves_static_override() {
        let dir = std::env::temp_dir().join(format!("phishguard-static-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create dir");
        std::fs::write(dir.join("index.html"), "<html><body>custom landing</body></html>")
            .expect("write index");

        let html = landing(Some(&dir));
        std::fs::remove_dir_all(&dir).ok();
        assert_eq!(html, "<html><body>custom landing</body></html>");
    }

    #[test]
    fn landing_falls_back_to_built_in_page() {
        let html = landing(Some(Path::new("/nonexistent/phishguard-static")));
        assert!(html.contains("Phishing URL check"));
    }
}
