// ============================================================
// Layer 1 — API Routes
// ============================================================
// warp filters and handlers for the two routes, plus the
// rejection recovery that normalises warp's built-in errors
// into the API's JSON error shape.
//
// The loaded ModelBundle is shared with every request through
// an Arc injected by a `with_bundle` filter — the model is
// loaded exactly once, at startup, never per request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::domain::record::PatientRecord;
use crate::ml::predictor::ModelBundle;

/// Liveness text served on the root route
const ROOT_BANNER: &str = "Heart Disease Prediction API running";

// ─── Request/Response types ──────────────────────────────────────────────────

/// Successful prediction body
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    /// The predicted class label
    pub prediction: i64,
    /// One probability per class, schema class order, sums to 1
    pub probabilities: Vec<f64>,
}

/// Error body for every non-2xx response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

// ─── Routes ──────────────────────────────────────────────────────────────────

/// Build the complete route tree over a loaded model.
///
/// Callers apply `.recover(handle_rejection)` themselves (the
/// serve use case and the tests both do), keeping this filter
/// composable.
pub fn api_routes(
    bundle: Arc<ModelBundle>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let root = warp::path::end()
        .and(warp::get())
        .map(|| ROOT_BANNER);

    let predict = warp::path("predict")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_bundle(bundle))
        .and_then(handle_predict);

    root.or(predict)
}

/// Inject the shared model bundle into a handler
fn with_bundle(
    bundle: Arc<ModelBundle>,
) -> impl Filter<Extract = (Arc<ModelBundle>,), Error = Infallible> + Clone {
    warp::any().map(move || bundle.clone())
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// POST /predict — classify one record.
///
/// The body must be a JSON object; warp's body filter already
/// rejected anything that isn't. Validation failures (missing
/// fields, wrong types) come back as 400 with the message from
/// the bundle's single inference path.
async fn handle_predict(
    body: Map<String, Value>,
    bundle: Arc<ModelBundle>,
) -> Result<warp::reply::Response, Rejection> {
    let record = PatientRecord::new(body);

    match bundle.predict_record(&record) {
        Ok(prediction) => {
            tracing::debug!(
                "Predicted class {} (p={:?})",
                prediction.label,
                prediction.probabilities
            );
            let resp = PredictResponse {
                prediction:    prediction.label,
                probabilities: prediction.probabilities,
            };
            Ok(warp::reply::with_status(warp::reply::json(&resp), StatusCode::OK)
                .into_response())
        }
        Err(e) => {
            tracing::debug!("Rejected prediction request: {}", e);
            let body = ApiError { error: e.to_string() };
            Ok(warp::reply::with_status(
                warp::reply::json(&body),
                StatusCode::BAD_REQUEST,
            )
            .into_response())
        }
    }
}

// ─── Rejection recovery ──────────────────────────────────────────────────────

/// Map warp's built-in rejections to the API's JSON error shape.
pub async fn handle_rejection(
    err: Rejection,
) -> Result<impl Reply, Infallible> {
    let (code, message): (StatusCode, String) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".into())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e))
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".into())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected application/json".into(),
        )
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ApiError { error: message }),
        code,
    ))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::encoder::FeaturePipeline;
    use crate::data::table::DataTable;
    use crate::domain::schema::FeatureSchema;
    use crate::ml::forest::{ForestParams, RandomForest};
    use serde_json::json;

    /// Small but real bundle: the label follows ST_Slope
    fn test_bundle() -> Arc<ModelBundle> {
        let mut rows = Vec::new();
        for i in 0..24 {
            let (slope, label) = if i % 2 == 0 { ("Up", "0") } else { ("Flat", "1") };
            rows.push(vec![
                format!("{}", 40 + i),
                slope.to_string(),
                label.to_string(),
            ]);
        }
        let table = DataTable::from_rows(
            vec!["Age".into(), "ST_Slope".into(), "HeartDisease".into()],
            rows,
        )
        .unwrap();
        let schema = FeatureSchema {
            feature_names: vec!["Age".into(), "ST_Slope".into()],
            categorical:   vec!["ST_Slope".into()],
            numerical:     vec!["Age".into()],
            target:        "HeartDisease".into(),
            classes:       vec![0, 1],
        };
        let all: Vec<usize> = (0..24).collect();
        let pipeline = FeaturePipeline::fit(&table, &schema, &all).unwrap();
        let x = pipeline.transform_table(&table, &all).unwrap();
        let y: Vec<usize> = (0..24).map(|i| i % 2).collect();
        let params = ForestParams { n_estimators: 15, ..ForestParams::default() };
        let forest = RandomForest::fit(&x, &y, 2, &params).unwrap();

        Arc::new(ModelBundle { schema, pipeline, forest })
    }

    fn routes(
        bundle: Arc<ModelBundle>,
    ) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
        api_routes(bundle).recover(handle_rejection)
    }

    #[tokio::test]
    async fn test_root_reports_running() {
        let resp = warp::test::request()
            .method("GET")
            .path("/")
            .reply(&routes(test_bundle()))
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.body(), ROOT_BANNER.as_bytes());
    }

    #[tokio::test]
    async fn test_predict_complete_record() {
        let resp = warp::test::request()
            .method("POST")
            .path("/predict")
            .json(&json!({ "Age": 45, "ST_Slope": "Flat" }))
            .reply(&routes(test_bundle()))
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: PredictResponse = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body.prediction, 1);
        assert_eq!(body.probabilities.len(), 2);
        assert!((body.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_predict_missing_feature_is_400() {
        let resp = warp::test::request()
            .method("POST")
            .path("/predict")
            .json(&json!({ "Age": 45 }))
            .reply(&routes(test_bundle()))
            .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ApiError = serde_json::from_slice(resp.body()).unwrap();
        assert!(body.error.contains("Missing features"));
        assert!(body.error.contains("ST_Slope"));
    }

    #[tokio::test]
    async fn test_predict_empty_object_is_400() {
        let resp = warp::test::request()
            .method("POST")
            .path("/predict")
            .json(&json!({}))
            .reply(&routes(test_bundle()))
            .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_predict_malformed_json_is_400() {
        let resp = warp::test::request()
            .method("POST")
            .path("/predict")
            .header("content-type", "application/json")
            .body("{not json")
            .reply(&routes(test_bundle()))
            .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ApiError = serde_json::from_slice(resp.body()).unwrap();
        assert!(body.error.contains("Invalid request body"));
    }

    #[tokio::test]
    async fn test_predict_wrong_type_is_400() {
        let resp = warp::test::request()
            .method("POST")
            .path("/predict")
            .json(&json!({ "Age": "old", "ST_Slope": "Up" }))
            .reply(&routes(test_bundle()))
            .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ApiError = serde_json::from_slice(resp.body()).unwrap();
        assert!(body.error.contains("'Age' must be numeric"));
    }

    #[tokio::test]
    async fn test_get_on_predict_is_405() {
        let resp = warp::test::request()
            .method("GET")
            .path("/predict")
            .reply(&routes(test_bundle()))
            .await;

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_full_pipeline_train_save_load_serve() {
        use crate::application::train_use_case::{TrainConfig, TrainUseCase};
        use crate::infra::artifact::ArtifactStore;
        use std::io::Write;

        // Train a real model into a temp dir...
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("heart.csv");
        let mut f = std::fs::File::create(&data_path).unwrap();
        writeln!(f, "Age,Sex,ChestPainType,MaxHR,Oldpeak,ST_Slope,HeartDisease")
            .unwrap();
        for i in 0..60 {
            let healthy = i % 2 == 0;
            let (pain, slope, oldpeak, label) = if healthy {
                ("ATA", "Up", 0.0, 0)
            } else {
                ("ASY", "Flat", 1.5, 1)
            };
            let sex = if i % 3 == 0 { "F" } else { "M" };
            writeln!(
                f,
                "{},{},{},{},{},{},{}",
                40 + i / 2,
                sex,
                pain,
                180 - i,
                oldpeak,
                slope,
                label
            )
            .unwrap();
        }

        let model_dir = dir.path().join("model").to_string_lossy().into_owned();
        TrainUseCase::new(TrainConfig {
            data_path: data_path.to_string_lossy().into_owned(),
            model_dir: model_dir.clone(),
            n_estimators: 30,
            ..TrainConfig::default()
        })
        .execute()
        .unwrap();

        // ...load it back the way the server does...
        let bundle = Arc::new(ArtifactStore::new(&model_dir).load_bundle().unwrap());

        // ...and hit the route with the canonical sample request
        let resp = warp::test::request()
            .method("POST")
            .path("/predict")
            .json(&json!({
                "Age": 40, "Sex": "M", "ChestPainType": "ATA",
                "MaxHR": 172, "Oldpeak": 0, "ST_Slope": "Up"
            }))
            .reply(&routes(bundle))
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: PredictResponse = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body.prediction, 0);
        assert!((body.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unknown_category_still_predicts() {
        // handle_unknown = ignore: never a server error
        let resp = warp::test::request()
            .method("POST")
            .path("/predict")
            .json(&json!({ "Age": 45, "ST_Slope": "Sideways" }))
            .reply(&routes(test_bundle()))
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
    }
}
