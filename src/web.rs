use std::sync::Arc;

use serde::{Deserialize, Serialize};
use warp::Filter;
use warp::filters::body::BodyDeserializeError;
use warp::http::StatusCode;

use crate::forward::evaluate;
use crate::log;
use crate::params::{Biases, NetParams, Weights};
use crate::utils::linspace;

/// Default plotting domain: 100 samples over [-5, 5].
const DOMAIN_MIN: f64 = -5.0;
const DOMAIN_MAX: f64 = 5.0;
const DOMAIN_SAMPLES: usize = 100;

const PORT: u16 = 3030;

/// Body of `POST /compute`. Everything is optional: missing weights or
/// biases fall back to the server's initial draw, a missing domain falls
/// back to the default linspace. The substitution happens here, never
/// inside the evaluator.
#[derive(Deserialize, Debug)]
struct ComputeRequest {
    weights: Option<Weights>,
    biases: Option<Biases>,
    x_values: Option<Vec<f64>>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn start_web_server(initial: NetParams) {
    let routes = routes(initial);

    log::info(&format!(
        "📈 Веб-сервер запущен на http://localhost:{PORT}/"
    ));
    warp::serve(routes).run(([127, 0, 0, 1], PORT)).await;
}

/// All routes of the explorer: the page itself, the initial parameter
/// draw, and the compute endpoint the page polls on every slider move.
pub fn routes(
    initial: NetParams,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let initial = Arc::new(initial);

    let index_route =
        warp::path::end().map(|| warp::reply::html(include_str!("index.html")));

    let params = Arc::clone(&initial);
    let params_route = warp::path("params").map(move || warp::reply::json(&*params));

    let compute_route = warp::path("compute")
        .and(warp::post())
        .and(warp::body::json())
        .map(move |req: ComputeRequest| compute_reply(&initial, req));

    index_route
        .or(params_route)
        .or(compute_route)
        .recover(handle_rejection)
}

fn compute_reply(initial: &NetParams, req: ComputeRequest) -> impl warp::Reply + use<> {
    let params = NetParams {
        weights: req.weights.unwrap_or_else(|| initial.weights.clone()),
        biases: req.biases.unwrap_or_else(|| initial.biases.clone()),
    };
    let xs = req
        .x_values
        .unwrap_or_else(|| linspace(DOMAIN_MIN, DOMAIN_MAX, DOMAIN_SAMPLES));

    match evaluate(&params, &xs) {
        Ok(trace) => warp::reply::with_status(warp::reply::json(&trace), StatusCode::OK),
        Err(err) => {
            log::warn(&format!("compute request refused: {err}"));
            warp::reply::with_status(
                warp::reply::json(&ErrorBody {
                    error: err.to_string(),
                }),
                StatusCode::BAD_REQUEST,
            )
        }
    }
}

// a body that does not parse as ComputeRequest (wrong nesting, a string
// where a number belongs) surfaces here instead of inside the evaluator
async fn handle_rejection(
    rej: warp::Rejection,
) -> Result<impl warp::Reply, warp::Rejection> {
    if let Some(err) = rej.find::<BodyDeserializeError>() {
        return Ok(warp::reply::with_status(
            warp::reply::json(&ErrorBody {
                error: format!("invalid parameters: {err}"),
            }),
            StatusCode::BAD_REQUEST,
        ));
    }
    if !rej.is_not_found() {
        log::error(&format!("unhandled rejection: {rej:?}"));
    }
    Err(rej)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn identity_body() -> Value {
        json!({
            "weights": {
                "w1": [[1.0, 1.0, 1.0]],
                "w2": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
                "w3": [[1.0], [1.0], [1.0]],
            },
            "biases": {
                "b1": [0.0, 0.0, 0.0],
                "b2": [0.0, 0.0, 0.0],
                "b3": [0.0],
            },
            "x_values": [-1.0, 0.0, 2.0],
        })
    }

    #[tokio::test]
    async fn index_serves_the_page() {
        let api = routes(NetParams::new_random());
        let resp = warp::test::request().path("/").reply(&api).await;
        assert_eq!(resp.status(), 200);
        assert!(std::str::from_utf8(resp.body()).unwrap().contains("<canvas"));
    }

    #[tokio::test]
    async fn params_route_serves_the_initial_draw() {
        let initial = NetParams::new_random();
        let expected = serde_json::to_value(&initial).unwrap();
        let api = routes(initial);

        let resp = warp::test::request().path("/params").reply(&api).await;
        assert_eq!(resp.status(), 200);
        let v: Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(v, expected);
    }

    #[tokio::test]
    async fn compute_returns_the_full_trace() {
        let api = routes(NetParams::new_random());
        let resp = warp::test::request()
            .method("POST")
            .path("/compute")
            .json(&identity_body())
            .reply(&api)
            .await;

        assert_eq!(resp.status(), 200);
        let v: Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(v["outputs"], json!([0.0, 0.0, 6.0]));
        assert_eq!(v["x_values"], json!([-1.0, 0.0, 2.0]));
        assert_eq!(v["hidden1_pre"].as_array().unwrap().len(), 3);
        assert_eq!(v["hidden2_post"][2].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn compute_falls_back_to_the_initial_draw_and_default_domain() {
        let api = routes(NetParams::new_random());
        let resp = warp::test::request()
            .method("POST")
            .path("/compute")
            .json(&json!({}))
            .reply(&api)
            .await;

        assert_eq!(resp.status(), 200);
        let v: Value = serde_json::from_slice(resp.body()).unwrap();
        let xs = v["x_values"].as_array().unwrap();
        assert_eq!(xs.len(), 100);
        assert_eq!(xs[0].as_f64().unwrap(), -5.0);
        assert!((xs[99].as_f64().unwrap() - 5.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn compute_refuses_a_shape_mismatch_with_400() {
        let mut body = identity_body();
        body["weights"]["w1"] = json!([[1.0, 2.0]]); // 1x2
        let api = routes(NetParams::new_random());
        let resp = warp::test::request()
            .method("POST")
            .path("/compute")
            .json(&body)
            .reply(&api)
            .await;

        assert_eq!(resp.status(), 400);
        let v: Value = serde_json::from_slice(resp.body()).unwrap();
        assert!(v["error"].as_str().unwrap().contains("w1"));
    }

    #[tokio::test]
    async fn compute_refuses_an_empty_domain_with_400() {
        let mut body = identity_body();
        body["x_values"] = json!([]);
        let api = routes(NetParams::new_random());
        let resp = warp::test::request()
            .method("POST")
            .path("/compute")
            .json(&body)
            .reply(&api)
            .await;

        assert_eq!(resp.status(), 400);
        let v: Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(v["error"], json!("input domain is empty"));
    }

    #[tokio::test]
    async fn compute_refuses_non_numeric_parameters_with_400() {
        let mut body = identity_body();
        body["weights"]["w1"] = json!([["a", "b", "c"]]);
        let api = routes(NetParams::new_random());
        let resp = warp::test::request()
            .method("POST")
            .path("/compute")
            .json(&body)
            .reply(&api)
            .await;

        assert_eq!(resp.status(), 400);
        let v: Value = serde_json::from_slice(resp.body()).unwrap();
        assert!(v["error"].as_str().unwrap().starts_with("invalid parameters"));
    }
}
