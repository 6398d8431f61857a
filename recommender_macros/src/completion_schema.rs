use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, ItemStruct, LitStr};

use crate::schema_extraction::{
    collect_doc_comments, collect_field_docs, ensure_named_struct, infer_description,
    infer_schema_name, parse_completion_schema_args, render_response_template,
};

pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match parse_completion_schema_args(attr) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    let item_struct = parse_macro_input!(item as ItemStruct);

    if let Err(err) = ensure_named_struct(&item_struct) {
        return err.to_compile_error().into();
    }

    if !item_struct.generics.params.is_empty() {
        return syn::Error::new(
            item_struct.generics.span(),
            "`#[completion_schema]` cannot be applied to generic structs",
        )
        .to_compile_error()
        .into();
    }

    let schema_name = infer_schema_name(&item_struct, args.name.as_ref());
    let description = infer_description(
        args.description.as_ref(),
        collect_doc_comments(&item_struct.attrs),
    );
    let description_tokens = match description.as_ref() {
        Some(lit) => quote! { Some(#lit) },
        None => quote! { None },
    };

    let field_docs = collect_field_docs(&item_struct);
    let field_doc_tokens: Vec<_> = field_docs
        .iter()
        .filter_map(|(field, doc)| {
            let doc = doc.as_ref()?;
            let field_lit = LitStr::new(field, Span::call_site());
            let doc_lit = LitStr::new(doc, Span::call_site());
            Some(quote! { (#field_lit, #doc_lit) })
        })
        .collect();

    let template = LitStr::new(&render_response_template(&field_docs), Span::call_site());
    let type_name = LitStr::new(&item_struct.ident.to_string(), Span::call_site());
    let ident = &item_struct.ident;

    let expanded = quote! {
        #item_struct

        impl hotel_recommender::schema::CompletionSchema for #ident {
            fn schema() -> &'static hotel_recommender::schema::SchemaHandle {
                static HANDLE: std::sync::OnceLock<hotel_recommender::schema::SchemaHandle> =
                    std::sync::OnceLock::new();
                HANDLE.get_or_init(|| {
                    let mut root = schemars::schema_for!(Self);
                    hotel_recommender::schema::apply_doc_comments(
                        &mut root,
                        #schema_name,
                        #description_tokens,
                        &[#(#field_doc_tokens),*],
                    );
                    hotel_recommender::schema::SchemaHandle::from_root_schema::<Self>(
                        #schema_name,
                        #type_name,
                        root,
                    )
                })
            }

            fn response_template() -> &'static str {
                #template
            }
        }
    };

    expanded.into()
}
