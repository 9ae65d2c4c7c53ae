/// unwrap a QueryResult inside a route handler. a missing row becomes
/// a 404, everything else is logged and becomes a 500.
macro_rules! db_handle_get_error_http {
    ( $data:expr, $target:expr, $type_str:expr) => {
        match $data {
            Ok(e) => e,
            Err(diesel::result::Error::NotFound) => {
                return Err(Status::NotFound);
            }
            Err(error) => {
                error!(target:$target, "Error getting {}. (error: {})", $type_str, error);
                return Err(Status::InternalServerError);
            }
        }
    };
}

/// unwrap a QueryResult inside the model layer, logging anything that
/// is not a plain NotFound before passing the error up.
macro_rules! db_handle_get_error {
    ( $data:expr, $target:expr, $type_str:expr) => {
        match $data {
            Ok(e) => e,
            Err(diesel::result::Error::NotFound) => {
                return Err(diesel::result::Error::NotFound);
            }
            Err(error) => {
                error!(target:$target, "Error getting {}. (error: {})", $type_str, error);
                return Err(error);
            }
        }
    };
}

pub(crate) use db_handle_get_error;
pub(crate) use db_handle_get_error_http;
