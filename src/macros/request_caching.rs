/// check if a response for this request path is cached and return it
/// directly if so, else fall through to the normal flow.
///
/// a redis outage is logged and ignored so the request is served
/// from the database instead.
///
/// does nothing when debug is enabled
macro_rules! read_cache_request {
    ( $origin:expr ) => {
        if !cfg!(debug_assertions) {
            let uri = $origin.path().to_string();
            match &mut Redis::connect() {
                Ok(r_conn) => {
                    if Redis::has_data::<String>(r_conn, uri.clone()).unwrap_or(false) {
                        if let Ok(data) = Redis::get_data::<String, String>(r_conn, uri.clone()) {
                            if let Ok(cached) = serde_json::from_str(&data) {
                                return Ok(cached);
                            }
                        }
                    }
                }
                Err(error) => {
                    error!(target:"macros/request_caching:read", "Error connecting to redis: {}", error);
                }
            }
        }
    };
}

/// store the response under the request path and return it.
///
/// a redis outage is logged and ignored, the response is still
/// returned to the client.
///
/// if debug is enabled we wont add to cache.
macro_rules! cache_response {
    ( $origin:expr, $data:expr ) => {
        if !cfg!(debug_assertions) {
            let uri = $origin.path().to_string();
            match &mut Redis::connect() {
                Ok(r_conn) => {
                    if let Ok(response_str) = serde_json::to_string(&$data) {
                        let _ = Redis::set_data::<String, String>(r_conn, uri, response_str);
                    }
                }
                Err(error) => {
                    error!(target:"macros/request_caching:write", "Error connecting to redis: {}", error);
                }
            }
        }

        return Ok($data)
    };
}

pub(crate) use cache_response;
pub(crate) use read_cache_request;
