use heck::ToSnakeCase;
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, LitStr};

/// Derives `forest_bot::projection::Command` for a unit struct, reading the
/// command name and description from `#[command(name = "...", description = "...")]`.
/// `name` is optional: left unset, it defaults to the struct identifier in
/// `snake_case` (`Dialogue1` -> `"dialogue1"`).
#[proc_macro_derive(Command, attributes(command))]
pub fn derive_command(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let ident = input.ident;

    let mut name = None;
    let mut description = String::new();

    for attr in &input.attrs {
        if !attr.path().is_ident("command") {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                name = Some(lit.value());
            } else if meta.path.is_ident("description") {
                let lit: LitStr = meta.value()?.parse()?;
                description = lit.value();
            }
            Ok(())
        });
    }

    let name = name.unwrap_or_else(|| ident.to_string().to_snake_case());

    let expanded = quote! {
        impl forest_bot::projection::Command for #ident {
            const NAME: &'static str = #name;
            const DESCRIPTION: &'static str = #description;
        }
    };

    TokenStream::from(expanded)
}

/// Derives `forest_bot::projection::Button` for a struct, using the struct
/// itself as the payload type.
#[proc_macro_derive(Button)]
pub fn derive_button(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let ident = input.ident;

    let expanded = quote! {
        impl forest_bot::projection::Button for #ident {
            type Payload = #ident;
        }
    };

    TokenStream::from(expanded)
}
