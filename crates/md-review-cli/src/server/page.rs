use md_review_engine::escape_for_html;

const TEMPLATE: &str = include_str!("../../assets/index.html");

/// The review page with `title` filled in.
pub fn render(title: &str) -> String {
    TEMPLATE.replace("{{title}}", &escape_for_html(title))
}
