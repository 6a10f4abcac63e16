//! HTML for the single form page, rendered from `templates/index.html`.
//!
//! The template name ends in `.html`, so minijinja auto-escapes every value.

use std::sync::OnceLock;

use minijinja::{context, Environment};

const INDEX_NAME: &str = "index.html";
const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// What to show under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Prediction(&'static str),
    Error(String),
}

fn environment() -> Result<&'static Environment<'static>, minijinja::Error> {
    static ENV: OnceLock<Environment<'static>> = OnceLock::new();
    if let Some(env) = ENV.get() {
        return Ok(env);
    }
    let mut env = Environment::new();
    env.add_template(INDEX_NAME, INDEX_HTML)?;
    Ok(ENV.get_or_init(|| env))
}

/// Render the form page, optionally with a prediction or error message.
pub fn render(outcome: Option<&Outcome>) -> Result<String, minijinja::Error> {
    let (prediction, error) = match outcome {
        None => (None, None),
        Some(Outcome::Prediction(name)) => (Some(*name), None),
        Some(Outcome::Error(message)) => (None, Some(message.as_str())),
    };
    environment()?
        .get_template(INDEX_NAME)?
        .render(context! { prediction, error })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page_has_all_fields() {
        let html = render(None).unwrap();
        for field in ["swidth", "sheight", "pwidth", "pheight"] {
            assert!(html.contains(&format!("name=\"{field}\"")));
        }
        assert!(!html.contains("class=\"result\""));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn messages_are_escaped() {
        let html = render(Some(&Outcome::Error("<script>&".into()))).unwrap();
        assert!(html.contains("&lt;script&gt;&amp;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn prediction_is_shown() {
        let html = render(Some(&Outcome::Prediction("Iris-virginica"))).unwrap();
        assert!(html.contains("<strong>Iris-virginica</strong>"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn error_hides_the_result_line() {
        let html = render(Some(&Outcome::Error("Invalid input: swidth must be a number".into())))
            .unwrap();
        assert!(html.contains("<p class=\"error\">Invalid input: swidth must be a number</p>"));
        assert!(!html.contains("Predicted species"));
    }
}
