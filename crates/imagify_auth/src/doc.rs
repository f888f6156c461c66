// --- File: crates/imagify_auth/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use imagify_common::MessageBody;
use utoipa::OpenApi;

use crate::logic::{AuthResponse, CreditsResponse, LoginRequest, RegisterRequest, UserSummary};

#[utoipa::path(
    post,
    path = "/user/register", // Path relative to /api
    request_body(content = RegisterRequest, example = json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "password": "correct horse battery staple"
    })),
    responses(
        (status = 200, description = "Account created, or `success: false` with a message", body = AuthResponse)
    ),
    tag = "User"
)]
fn doc_register_handler() {}

#[utoipa::path(
    post,
    path = "/user/login", // Path relative to /api
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token, or `success: false` with a message", body = AuthResponse)
    ),
    tag = "User"
)]
fn doc_login_handler() {}

#[utoipa::path(
    get,
    path = "/user/credits", // Path relative to /api
    responses(
        (status = 200, description = "Current credit balance, or `success: false` with \"Not Authorized. Login Again\"", body = CreditsResponse)
    ),
    security(("bearer_token" = [])),
    tag = "User"
)]
fn doc_credits_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_register_handler, doc_login_handler, doc_credits_handler),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        CreditsResponse,
        UserSummary,
        MessageBody
    )),
    tags((name = "User", description = "Registration, login and credit balance"))
)]
pub struct AuthApiDoc;
