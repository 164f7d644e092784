//! HTML pages. Templates are embedded at compile time and parsed once at startup.

use axum::response::Html;
use tera::{Context, Tera};

use crate::errors::AppError;

pub const PROFILE_PAGE: &str = "profile.html";
pub const QUIZ_PAGE: &str = "quiz.html";
pub const RESULT_PAGE: &str = "result.html";

/// Parses every page template. `.html` templates are autoescaped.
pub fn load_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../templates/base.html")),
        (PROFILE_PAGE, include_str!("../../templates/profile.html")),
        (QUIZ_PAGE, include_str!("../../templates/quiz.html")),
        (RESULT_PAGE, include_str!("../../templates/result.html")),
    ])?;
    Ok(tera)
}

pub fn render_page(tera: &Tera, name: &str, context: &Context) -> Result<Html<String>, AppError> {
    tera.render(name, context)
        .map(Html)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("rendering {name} failed: {e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_templates_parse() {
        let tera = load_templates().unwrap();
        let names: Vec<&str> = tera.get_template_names().collect();
        for page in [PROFILE_PAGE, QUIZ_PAGE, RESULT_PAGE] {
            assert!(names.contains(&page), "{page} missing");
        }
    }

    #[test]
    fn test_quiz_page_escapes_generated_text() {
        let tera = load_templates().unwrap();
        let mut context = Context::new();
        context.insert("pid", "p1");
        context.insert(
            "questions",
            &json!([{"id": 1, "question": "<script>x</script>", "options": ["A"]}]),
        );

        let html = render_page(&tera, QUIZ_PAGE, &context).unwrap().0;
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_result_page_without_recommendations() {
        let tera = load_templates().unwrap();
        let mut context = Context::new();
        context.insert(
            "user",
            &json!({"name": "Sam", "age": "31", "gender": "m", "preference": "jazz",
                    "language": "en", "reference": "", "quiz_answers": []}),
        );
        context.insert("answers", &Vec::<String>::new());
        context.insert("recommendations", &Vec::<String>::new());

        let html = render_page(&tera, RESULT_PAGE, &context).unwrap().0;
        assert!(html.contains("Songs for Sam"));
        assert!(html.contains("No recommendations yet."));
    }
}
