use std::fs;
use std::io::ErrorKind;

use crate::errors::{CustomResult, Error};
use crate::modules::result_entry::ResultSheet;

pub struct SheetsHelper {}

impl SheetsHelper {
    /// # load result sheets from a json file
    /// the file holds an array of sheets, one per event.
    ///
    /// ## Arguments
    /// * `path` - the path of the file to load
    ///
    /// ## Returns
    /// * `Vec<ResultSheet>` - the parsed sheets
    pub fn load_sheets_from_file(path: &str) -> CustomResult<Vec<ResultSheet>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) => {
                return Err(match error.kind() {
                    ErrorKind::NotFound => Error::FileDoesNotExistError {
                        path: path.to_string(),
                    },
                    ErrorKind::PermissionDenied => Error::PermissionDeniedError {
                        path: path.to_string(),
                    },
                    _ => Error::InvalidResultSheetError {
                        reason: format!("could not read {}: {}", path, error),
                    },
                });
            }
        };

        serde_json::from_str::<Vec<ResultSheet>>(&contents).map_err(|error| {
            Error::InvalidResultSheetError {
                reason: format!("could not parse {}: {}", path, error),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_maps_to_file_does_not_exist() {
        let loaded = SheetsHelper::load_sheets_from_file("./no-such-file.json");
        assert!(matches!(loaded, Err(Error::FileDoesNotExistError { .. })));
    }
}
