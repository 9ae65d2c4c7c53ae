use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// derive a rocket responder that serializes the struct to a json body.
/// the struct needs to implement serde::Serialize.
#[proc_macro_derive(JsonResponse)]
pub fn derive_json_response(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    let expanded = quote! {
        impl<'r> ::rocket::response::Responder<'r, 'static> for #name {
            fn respond_to(self, _request: &'r ::rocket::request::Request<'_>) -> ::rocket::response::Result<'static> {
                let body = match ::serde_json::to_string(&self) {
                    Ok(body) => body,
                    Err(_) => return Err(::rocket::http::Status::InternalServerError),
                };

                ::rocket::response::Response::build()
                    .header(::rocket::http::ContentType::JSON)
                    .sized_body(body.len(), ::std::io::Cursor::new(body))
                    .ok()
            }
        }
    };

    TokenStream::from(expanded)
}
