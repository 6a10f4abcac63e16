use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::{Form, Json};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use super::page::{self, Outcome};
use crate::data::model::{LabelEntry, Sample};
use crate::error::FormError;
use crate::service::IrisService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<IrisService>,
}

/// Raw form fields. Kept as strings so bad numbers render a message
/// instead of being rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct MeasurementForm {
    pub swidth: Option<String>,
    pub sheight: Option<String>,
    pub pwidth: Option<String>,
    pub pheight: Option<String>,
}

impl MeasurementForm {
    pub fn to_sample(&self) -> Result<Sample, FormError> {
        Ok(Sample::new(
            number("swidth", self.swidth.as_deref())?,
            number("sheight", self.sheight.as_deref())?,
            number("pwidth", self.pwidth.as_deref())?,
            number("pheight", self.pheight.as_deref())?,
        ))
    }
}

fn number(field: &'static str, value: Option<&str>) -> Result<f64, FormError> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or(FormError::NotANumber { field })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub source: String,
    pub samples: usize,
}

type PageResult = Result<Html<String>, (StatusCode, String)>;

fn render_page(outcome: Option<&Outcome>) -> PageResult {
    page::render(outcome).map(Html).map_err(|e| {
        error!("rendering page failed: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
    })
}

pub async fn index() -> PageResult {
    render_page(None)
}

pub async fn predict(
    State(state): State<AppState>,
    Form(form): Form<MeasurementForm>,
) -> PageResult {
    let sample = match form.to_sample() {
        Ok(sample) => sample,
        Err(e) => {
            warn!("rejected form input: {e}");
            return render_page(Some(&Outcome::Error(e.to_string())));
        }
    };

    match state.service.predict_name(&sample) {
        Ok(name) => {
            debug!(
                "predicted {name} for sepal {}x{}, petal {}x{}",
                sample.sepal_width(),
                sample.sepal_height(),
                sample.petal_width(),
                sample.petal_height()
            );
            render_page(Some(&Outcome::Prediction(name)))
        }
        Err(e) => {
            error!("prediction failed: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Prediction failed".to_string(),
            ))
        }
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let info = state.service.info();
    Json(HealthResponse {
        status: "ok",
        source: info.source.clone(),
        samples: info.samples,
    })
}

/// The integer ↔ species table the model was trained with.
pub async fn labels(State(state): State<AppState>) -> Json<Vec<LabelEntry>> {
    Json(state.service.label_table().entries())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(sw: &str, sh: &str, pw: &str, ph: &str) -> MeasurementForm {
        MeasurementForm {
            swidth: Some(sw.into()),
            sheight: Some(sh.into()),
            pwidth: Some(pw.into()),
            pheight: Some(ph.into()),
        }
    }

    #[test]
    fn parses_numbers_with_whitespace() {
        let sample = form(" 5.1", "3.5 ", "1.4", "-0.2").to_sample().unwrap();
        assert_eq!(sample, Sample::new(5.1, 3.5, 1.4, -0.2));
    }

    #[test]
    fn names_the_first_bad_field() {
        let err = form("abc", "3.5", "1.4", "0.2").to_sample().unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: swidth must be a number");

        let err = form("5.1", "3.5", "", "0.2").to_sample().unwrap_err();
        assert_eq!(err, FormError::NotANumber { field: "pwidth" });
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let err = form("5.1", "NaN", "1.4", "0.2").to_sample().unwrap_err();
        assert_eq!(err, FormError::NotANumber { field: "sheight" });

        let err = form("5.1", "3.5", "1.4", "inf").to_sample().unwrap_err();
        assert_eq!(err, FormError::NotANumber { field: "pheight" });
    }

    #[test]
    fn missing_field_is_rejected() {
        let err = MeasurementForm::default().to_sample().unwrap_err();
        assert_eq!(err, FormError::NotANumber { field: "swidth" });
    }
}
