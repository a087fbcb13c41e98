//! Admin session guard

/// Reject the request with 401 unless the session middleware attached a
/// verified [`SessionContext`](crate::SessionContext). Evaluates to the
/// session's username.
///
/// ```ignore
/// async fn handler(req: HttpRequest) -> HttpResponse {
///     let username = secured!(&req);
///     ...
/// }
/// ```
#[macro_export]
macro_rules! secured {
    ($req: expr) => {
        match actix_web::HttpMessage::extensions($req)
            .get::<$crate::SessionContext>()
            .cloned()
        {
            Some(__session) if __session.is_authenticated() => __session.username,
            Some(__session) if __session.token_provided => {
                return $crate::model::ApiResult::http_unauthorized(
                    __session.error.as_deref().unwrap_or("invalid session"),
                );
            }
            _ => {
                return $crate::model::ApiResult::http_unauthorized("no session");
            }
        }
    };
}
