use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, parse_macro_input};

pub(crate) fn expand(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match try_expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn try_expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let collection = collection_name(input)?;
    let id_field = id_field(input)?;

    Ok(quote! {
        impl ::tessera::Model for #name {
            fn id(&self) -> &::tessera::bson::Uuid {
                &self.#id_field
            }

            fn collection_name() -> &'static str {
                #collection
            }
        }
    })
}

/// Resolves the collection name: `#[model(collection = "..")]` if present,
/// otherwise the lowercased struct name with an `s` appended.
fn collection_name(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("model") {
            continue;
        }

        let mut found = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                found = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported model attribute"))
            }
        })?;

        if let Some(name) = found {
            return Ok(name);
        }
    }

    Ok(format!("{}s", input.ident.to_string().to_lowercase()))
}

/// Resolves the id field: the field tagged `#[model(id)]` if present,
/// otherwise the field literally named `id`.
fn id_field(input: &DeriveInput) -> syn::Result<Ident> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Model can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Model can only be derived for structs",
            ));
        }
    };

    for field in fields {
        for attr in &field.attrs {
            if !attr.path().is_ident("model") {
                continue;
            }

            let mut is_id = false;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    is_id = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported model attribute"))
                }
            })?;

            if is_id {
                return Ok(field.ident.clone().expect("named field has an ident"));
            }
        }
    }

    fields
        .iter()
        .find_map(|field| {
            field
                .ident
                .clone()
                .filter(|ident| ident == "id")
        })
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "Model needs a field named `id` or one tagged #[model(id)]",
            )
        })
}
