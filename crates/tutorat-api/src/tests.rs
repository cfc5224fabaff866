//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt as _;
use tutorat_core::{
  response::{ModalityStats, Response, ResponseView},
  store::ResponseStore,
  submission::Submission,
};
use tutorat_store_sqlite::SqliteStore;

use crate::api_router;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(Arc::new(store))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let res = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = res.status();
  let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
  let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  (status, json)
}

fn questionnaire(modalite: &str, ville: &str) -> Value {
  json!({
    "ville": ville,
    "etablissement": "Lycée X",
    "modalite": modalite,
    "q1_accueil": "oui",
    "q2_adaptation_tuteur": "oui",
    "q3_tuteur_attitré": "oui",
    "q4_changement_tuteur": "non",
    "q5_missions_claires": "oui",
    "q6_communication": "na",
    "q7_suivi_retours": "oui",
    "q8_reconnaissance": "oui",
    "q9_autre_aspect": "non",
    "suggestion": "plus de suivi",
    "point_positif": "bonne ambiance",
  })
}

// ── Submit ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_accepts_complete_questionnaire() {
  let app = app().await;
  let (status, body) =
    send(&app, "POST", "/submit", Some(questionnaire("stage", "Lyon"))).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "success": true, "message": "Réponse enregistrée avec succès" }));
}

#[tokio::test]
async fn submit_missing_field_is_rejected_without_a_row() {
  let app = app().await;
  let mut q = questionnaire("stage", "Lyon");
  q.as_object_mut().unwrap().remove("q7_suivi_retours");
  q["suggestion"] = json!("   ");

  let (status, body) = send(&app, "POST", "/submit", Some(q)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Tous les champs sont requis");
  assert_eq!(body["champs_manquants"], json!(["q7_suivi_retours", "suggestion"]));

  let (_, stats) = send(&app, "GET", "/stats", None).await;
  assert_eq!(stats, json!({ "modalites": [] }));
}

#[tokio::test]
async fn submit_malformed_json_is_a_bad_request() {
  let app = app().await;
  let req = Request::builder()
    .method("POST")
    .uri("/submit")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{\"ville\":"))
    .unwrap();
  let res = app.oneshot(req).await.unwrap();
  assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_array_body_is_a_bad_request() {
  let app = app().await;
  let (status, body) = send(&app, "POST", "/submit", Some(json!(["Lyon"]))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn submit_over_long_answer_is_a_bad_request() {
  let app = app().await;
  let mut q = questionnaire("stage", "Lyon");
  q["q1_accueil"] = json!("absolument oui");
  let (status, body) = send(&app, "POST", "/submit", Some(q)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Le champ q1_accueil dépasse 10 caractères");
}

// ── Synthesis / stats / publication ─────────────────────────────────────────

#[tokio::test]
async fn end_to_end_publication_cycle() {
  let app = app().await;

  let (status, _) =
    send(&app, "POST", "/submit", Some(questionnaire("apprentissage", "Lyon"))).await;
  assert_eq!(status, StatusCode::OK);

  let (status, stats) = send(&app, "GET", "/stats", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    stats,
    json!({ "modalites": [{ "modalite": "apprentissage", "total": 1, "non_publies": 1 }] })
  );

  let (status, synth) = send(&app, "GET", "/synthese/apprentissage", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(synth["modalite"], "apprentissage");
  assert_eq!(synth["total_reponses"], 1);
  let row = &synth["reponses"][0];
  assert_eq!(row["ville"], "Lyon");
  assert_eq!(row["q6_communication"], "na");
  assert!(row["date_soumission"].is_string());
  assert!(row.get("id").is_none());
  assert!(row.get("publie_dans_synthese").is_none());

  let (status, marked) = send(&app, "POST", "/marquer-publie/apprentissage", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    marked,
    json!({ "success": true, "message": "1 réponses marquées comme publiées" })
  );

  let (_, synth) = send(&app, "GET", "/synthese/apprentissage", None).await;
  assert_eq!(synth["total_reponses"], 0);
  assert_eq!(synth["reponses"], json!([]));

  let (_, stats) = send(&app, "GET", "/stats", None).await;
  assert_eq!(stats["modalites"][0]["total"], 1);
  assert_eq!(stats["modalites"][0]["non_publies"], 0);

  let (status, again) = send(&app, "POST", "/marquer-publie/apprentissage", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(again["message"], "0 réponses marquées comme publiées");
}

#[tokio::test]
async fn synthesis_lists_most_recent_first() {
  let app = app().await;
  for ville in ["Lyon", "Nantes"] {
    send(&app, "POST", "/submit", Some(questionnaire("stage", ville))).await;
  }
  send(&app, "POST", "/submit", Some(questionnaire("apprentissage", "Brest"))).await;

  let (_, synth) = send(&app, "GET", "/synthese/stage", None).await;
  assert_eq!(synth["total_reponses"], 2);
  assert_eq!(synth["reponses"][0]["ville"], "Nantes");
  assert_eq!(synth["reponses"][1]["ville"], "Lyon");
}

#[tokio::test]
async fn synthesis_decodes_percent_encoded_modality() {
  let app = app().await;
  send(&app, "POST", "/submit", Some(questionnaire("stage long", "Lyon"))).await;

  let (status, synth) = send(&app, "GET", "/synthese/stage%20long", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(synth["modalite"], "stage long");
  assert_eq!(synth["total_reponses"], 1);
}

#[tokio::test]
async fn padded_modality_is_matched_exactly() {
  let app = app().await;
  send(&app, "POST", "/submit", Some(questionnaire("stage", "Lyon"))).await;

  let (status, synth) = send(&app, "GET", "/synthese/%20stage%20", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(synth["modalite"], " stage ");
  assert_eq!(synth["total_reponses"], 0);

  let (_, marked) = send(&app, "POST", "/marquer-publie/%20stage%20", None).await;
  assert_eq!(marked["message"], "0 réponses marquées comme publiées");

  let (_, synth) = send(&app, "GET", "/synthese/stage", None).await;
  assert_eq!(synth["total_reponses"], 1);
}

#[tokio::test]
async fn blank_modality_is_a_bad_request() {
  let app = app().await;
  let (status, _) = send(&app, "GET", "/synthese/%20", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let (status, _) = send(&app, "POST", "/marquer-publie/%20", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_modality_has_empty_synthesis() {
  let app = app().await;
  let (status, synth) = send(&app, "GET", "/synthese/inconnue", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(synth, json!({ "modalite": "inconnue", "total_reponses": 0, "reponses": [] }));
}

// ── Storage failures ────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("store unavailable")]
struct Unavailable;

#[derive(Clone)]
struct FailingStore;

impl ResponseStore for FailingStore {
  type Error = Unavailable;

  async fn insert(&self, _: Submission) -> Result<Response, Unavailable> { Err(Unavailable) }

  async fn get_unpublished(&self, _: String) -> Result<Vec<ResponseView>, Unavailable> {
    Err(Unavailable)
  }

  async fn get_stats(&self) -> Result<Vec<ModalityStats>, Unavailable> { Err(Unavailable) }

  async fn mark_published(&self, _: String) -> Result<u64, Unavailable> { Err(Unavailable) }
}

#[tokio::test]
async fn storage_errors_map_to_500_without_detail() {
  let app = api_router(Arc::new(FailingStore));

  let (status, body) =
    send(&app, "POST", "/submit", Some(questionnaire("stage", "Lyon"))).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body, json!({ "error": "Erreur serveur" }));

  for (method, uri) in [
    ("GET", "/stats"),
    ("GET", "/synthese/stage"),
    ("POST", "/marquer-publie/stage"),
  ] {
    let (status, _) = send(&app, method, uri, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
  }
}

#[tokio::test]
async fn validation_precedes_storage() {
  let app = api_router(Arc::new(FailingStore));
  let (status, _) = send(&app, "POST", "/submit", Some(json!({ "ville": "Lyon" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}
