#![crate_type = "proc-macro"]
#![allow(unused_imports)]
use syn::{self, parse, parse_macro_input, spanned::Spanned, Expr, Ident, ItemFn};

use proc_macro::TokenStream;
use quote::{self, ToTokens};

mod kw {
    syn::custom_keyword!(Capacity);
    syn::custom_keyword!(SharedCache);
    syn::custom_keyword!(Format);
    syn::custom_keyword!(Dir);
    syn::custom_keyword!(Policy);
    syn::custom_keyword!(Config);
    syn::custom_punctuation!(Colon, :);
}

#[derive(Default, Clone)]
struct MemoOptions {
    lru_max_entries: Option<usize>,
    shared_cache: bool,
}

#[derive(Clone)]
enum MemoOption {
    LRUMaxEntries(usize),
    SharedCache,
}

#[allow(unreachable_code)]
impl parse::Parse for MemoOption {
    fn parse(input: parse::ParseStream) -> syn::Result<Self> {
        let la = input.lookahead1();
        if la.peek(kw::Capacity) {
            #[cfg(not(feature = "full"))]
            return Err(syn::Error::new(input.span(),
            "memostash error: Capacity specified, but the feature 'full' is not enabled! To fix this, compile with `--features=full`.",
            ));

            input.parse::<kw::Capacity>()?;
            input.parse::<kw::Colon>()?;
            let cap: syn::LitInt = input.parse()?;
            return Ok(MemoOption::LRUMaxEntries(cap.base10_parse()?));
        }
        if la.peek(kw::SharedCache) {
            input.parse::<kw::SharedCache>()?;
            return Ok(MemoOption::SharedCache);
        }
        Err(la.error())
    }
}

impl parse::Parse for MemoOptions {
    fn parse(input: parse::ParseStream) -> syn::Result<Self> {
        let f: syn::punctuated::Punctuated<MemoOption, syn::Token![,]> =
            input.parse_terminated(MemoOption::parse)?;
        let mut opts = Self::default();

        for opt in f {
            match opt {
                MemoOption::LRUMaxEntries(cap) => opts.lru_max_entries = Some(cap),
                MemoOption::SharedCache => opts.shared_cache = true,
            }
        }
        Ok(opts)
    }
}

/// Options of `#[save_result]`. `Config` excludes the other three.
#[derive(Default, Clone)]
struct SaveOptions {
    format: Option<Ident>,
    dir: Option<Expr>,
    policy: Option<Ident>,
    config: Option<Expr>,
}

#[derive(Clone)]
enum SaveOption {
    Format(Ident),
    Dir(Expr),
    Policy(Ident),
    Config(Expr),
}

impl parse::Parse for SaveOption {
    fn parse(input: parse::ParseStream) -> syn::Result<Self> {
        let la = input.lookahead1();
        if la.peek(kw::Format) {
            input.parse::<kw::Format>()?;
            input.parse::<kw::Colon>()?;
            return Ok(SaveOption::Format(input.parse()?));
        }
        if la.peek(kw::Dir) {
            input.parse::<kw::Dir>()?;
            input.parse::<kw::Colon>()?;
            return Ok(SaveOption::Dir(input.parse()?));
        }
        if la.peek(kw::Policy) {
            input.parse::<kw::Policy>()?;
            input.parse::<kw::Colon>()?;
            return Ok(SaveOption::Policy(input.parse()?));
        }
        if la.peek(kw::Config) {
            input.parse::<kw::Config>()?;
            input.parse::<kw::Colon>()?;
            return Ok(SaveOption::Config(input.parse()?));
        }
        Err(la.error())
    }
}

impl parse::Parse for SaveOptions {
    fn parse(input: parse::ParseStream) -> syn::Result<Self> {
        let f: syn::punctuated::Punctuated<SaveOption, syn::Token![,]> =
            input.parse_terminated(SaveOption::parse)?;
        let mut opts = Self::default();

        for opt in f {
            match opt {
                SaveOption::Format(format) => opts.format = Some(format),
                SaveOption::Dir(dir) => opts.dir = Some(dir),
                SaveOption::Policy(policy) => opts.policy = Some(policy),
                SaveOption::Config(config) => opts.config = Some(config),
            }
        }
        if let Some(config) = &opts.config {
            if opts.format.is_some() || opts.dir.is_some() || opts.policy.is_some() {
                return Err(syn::Error::new(
                    config.span(),
                    "memostash error: Config cannot be combined with Format, Dir or Policy",
                ));
            }
        }
        Ok(opts)
    }
}

impl SaveOptions {
    /// Expression building the `CacheConfig` the wrapper hands to the runtime.
    fn config_expr(&self) -> syn::Result<proc_macro2::TokenStream> {
        if let Some(config) = &self.config {
            return Ok(quote::quote! { #config });
        }
        let mut expr = match &self.format {
            None => quote::quote! { ::memostash::CacheConfig::default() },
            Some(format) => {
                let variant = format_variant(format)?;
                quote::quote! { ::memostash::CacheConfig::new(::memostash::SaveFormat::#variant) }
            }
        };
        if let Some(dir) = &self.dir {
            expr = quote::quote! { #expr.in_dir(#dir) };
        }
        if let Some(policy) = &self.policy {
            let variant = policy_variant(policy)?;
            expr = quote::quote! { #expr.with_policy(::memostash::OverwritePolicy::#variant) };
        }
        Ok(expr)
    }
}

fn format_variant(format: &Ident) -> syn::Result<Ident> {
    let name = match format.to_string().as_str() {
        "Binary" | "Pickle" => "Binary",
        "Csv" => "Csv",
        "Spreadsheet" | "Excel" => "Spreadsheet",
        other => {
            return Err(syn::Error::new(
                format.span(),
                format!(
                    "unsupported format `{}`; supported formats: Binary, Csv, Spreadsheet",
                    other
                ),
            ))
        }
    };
    Ok(Ident::new(name, format.span()))
}

fn policy_variant(policy: &Ident) -> syn::Result<Ident> {
    match policy.to_string().as_str() {
        "CompareFirst" | "Always" => Ok(policy.clone()),
        other => Err(syn::Error::new(
            policy.span(),
            format!(
                "unknown overwrite policy `{}`; expected CompareFirst or Always",
                other
            ),
        )),
    }
}

// Unbounded stores only: plain HashMap.
#[cfg(not(feature = "full"))]
mod store {
    use crate::MemoOptions;

    /// Store type and its initializer.
    pub(crate) fn construct_cache(
        _options: &MemoOptions,
        key_type: proc_macro2::TokenStream,
        value_type: proc_macro2::TokenStream,
    ) -> (proc_macro2::TokenStream, proc_macro2::TokenStream) {
        (
            quote::quote! { std::collections::HashMap<#key_type, #value_type> },
            quote::quote! { std::collections::HashMap::new() },
        )
    }

    /// (insert, get) method names of the store.
    pub(crate) fn cache_access_methods(
        _options: &MemoOptions,
    ) -> (proc_macro2::TokenStream, proc_macro2::TokenStream) {
        (quote::quote! { insert }, quote::quote! { get })
    }
}

// `Capacity` stores are `lru::LruCache`, reached through the runtime crate.
#[cfg(feature = "full")]
mod store {
    use crate::MemoOptions;

    /// Store type (`Container<K, V>`) and its initializer expression.
    pub(crate) fn construct_cache(
        options: &MemoOptions,
        key_type: proc_macro2::TokenStream,
        value_type: proc_macro2::TokenStream,
    ) -> (proc_macro2::TokenStream, proc_macro2::TokenStream) {
        match options.lru_max_entries {
            None => (
                quote::quote! { std::collections::HashMap<#key_type, #value_type> },
                quote::quote! { std::collections::HashMap::new() },
            ),
            Some(cap) => (
                quote::quote! { ::memostash::lru::LruCache<#key_type, #value_type> },
                quote::quote! { ::memostash::lru::LruCache::new(#cap) },
            ),
        }
    }

    /// (insert, get) method names of the store.
    pub(crate) fn cache_access_methods(
        options: &MemoOptions,
    ) -> (proc_macro2::TokenStream, proc_macro2::TokenStream) {
        match options.lru_max_entries {
            None => (quote::quote! { insert }, quote::quote! { get }),
            Some(_) => (quote::quote! { put }, quote::quote! { get }),
        }
    }
}

/**
 * memoize keeps the results of a (simple enough) function in memory.
 *
 * Arguments must be `Clone + Hash + Eq`, the return value `Clone`. Methods are not supported.
 * By default each thread has its own store; `SharedCache` switches to one `Mutex`-protected
 * store for the whole process.
 *
 * ```ignore
 * use memostash::memoize;
 * #[memoize]
 * fn hello(arg: String, arg2: usize) -> bool {
 *      arg.len()%2 == arg2
 * }
 *
 * // `hello` is only called once.
 * assert!(! hello("World".to_string(), 0));
 * assert!(! hello("World".to_string(), 0));
 * ```
 *
 * With the `full` feature, `#[memoize(Capacity: 12)]` bounds the store to an `lru::LruCache`
 * of that many entries.
 *
 * Alongside the memoized function this generates `memoized_original_{fn}` (the plain body),
 * `memoized_flush_{fn}()` to clear the store and `memoized_size_{fn}()` to count its entries,
 * all with the visibility of the memoized function.
 */
#[proc_macro_attribute]
pub fn memoize(attr: TokenStream, item: TokenStream) -> TokenStream {
    let options = parse_macro_input!(attr as MemoOptions);
    let func = parse_macro_input!(item as ItemFn);
    let sig = &func.sig;

    let fn_name = &sig.ident.to_string();
    let renamed_name = format!("memoized_original_{}", fn_name);
    let flush_name = Ident::new(&format!("memoized_flush_{}", fn_name), sig.span());
    let size_name = Ident::new(&format!("memoized_size_{}", fn_name), sig.span());
    let map_name = format!("memoized_mapping_{}", fn_name);

    let (input_types, input_names) = match check_signature(sig, "memoize") {
        Ok(extracted) => extracted,
        Err(e) => return e.to_compile_error().into(),
    };

    let input_tuple_type = quote::quote! { (#(#input_types),*) };
    let return_type = match &sig.output {
        syn::ReturnType::Default => quote::quote! { () },
        syn::ReturnType::Type(_, ty) => ty.to_token_stream(),
    };

    let store_ident = Ident::new(&map_name.to_uppercase(), sig.span());
    let (cache_type, cache_init) =
        store::construct_cache(&options, input_tuple_type, return_type);
    let store = if options.shared_cache {
        quote::quote! {
            ::memostash::lazy_static::lazy_static! {
                static ref #store_ident : std::sync::Mutex<#cache_type> =
                    std::sync::Mutex::new(#cache_init);
            }
        }
    } else {
        quote::quote! {
            std::thread_local! {
                static #store_ident : std::cell::RefCell<#cache_type> =
                    std::cell::RefCell::new(#cache_init);
            }
        }
    };

    let mut renamed_fn = func.clone();
    renamed_fn.sig.ident = Ident::new(&renamed_name, func.sig.span());
    let original_id = &renamed_fn.sig.ident;

    let key = quote::quote! { (#(#input_names),*) };
    let key_cloned = quote::quote! { (#(#input_names.clone()),*) };
    let (insert_fn, get_fn) = store::cache_access_methods(&options);

    // The store is released while the original runs, so recursive calls can reach it.
    let memoizer = if options.shared_cache {
        quote::quote! {
            {
                let mut MEMOSTASH_STORE__ = #store_ident.lock().unwrap();
                if let Some(MEMOSTASH_HIT__) = MEMOSTASH_STORE__.#get_fn(&#key_cloned).cloned() {
                    return MEMOSTASH_HIT__;
                }
            }
            let MEMOSTASH_RETURN__ = #original_id(#(#input_names.clone()),*);
            #store_ident.lock().unwrap().#insert_fn(#key, MEMOSTASH_RETURN__.clone());
            MEMOSTASH_RETURN__
        }
    } else {
        quote::quote! {
            let MEMOSTASH_HIT__ = #store_ident.with(|MEMOSTASH_STORE__| {
                MEMOSTASH_STORE__.borrow_mut().#get_fn(&#key_cloned).cloned()
            });
            if let Some(MEMOSTASH_HIT__) = MEMOSTASH_HIT__ {
                return MEMOSTASH_HIT__;
            }
            let MEMOSTASH_RETURN__ = #original_id(#(#input_names.clone()),*);
            #store_ident.with(|MEMOSTASH_STORE__| {
                MEMOSTASH_STORE__.borrow_mut().#insert_fn(#key, MEMOSTASH_RETURN__.clone());
            });
            MEMOSTASH_RETURN__
        }
    };

    let (flush_body, size_body) = if options.shared_cache {
        (
            quote::quote! { #store_ident.lock().unwrap().clear(); },
            quote::quote! { #store_ident.lock().unwrap().len() },
        )
    } else {
        (
            quote::quote! { #store_ident.with(|MEMOSTASH_STORE__| MEMOSTASH_STORE__.borrow_mut().clear()); },
            quote::quote! { #store_ident.with(|MEMOSTASH_STORE__| MEMOSTASH_STORE__.borrow().len()) },
        )
    };

    let vis = &func.vis;

    quote::quote! {
        #renamed_fn
        #store

        #[allow(non_snake_case)]
        #vis fn #flush_name() {
            #flush_body
        }

        #[allow(non_snake_case)]
        #vis fn #size_name() -> usize {
            #size_body
        }

        #[allow(non_snake_case, unused_mut)]
        #vis #sig {
            #memoizer
        }
    }
    .into()
}

/**
 * save_result persists the return value of a function to disk every time it is called.
 *
 * The decorated function runs its body, stores the result in a file named
 * `{fn}_result.{ext}` and returns the fresh result wrapped in `memostash::Result`. When a file
 * from an earlier run holds an equal value it is left alone; otherwise it is overwritten. The
 * return type must implement `memostash::Persist`, `PartialEq` and `Debug`.
 *
 * ```ignore
 * use memostash::save_result;
 *
 * #[save_result(Format: Csv, Dir: "results")]
 * fn answer() -> u64 {
 *     42
 * }
 *
 * assert_eq!(answer().unwrap(), 42);
 * ```
 *
 * Options:
 *
 * - `Format: Binary | Csv | Spreadsheet` (`Pickle` and `Excel` are accepted as aliases).
 *   Defaults to `Spreadsheet`.
 * - `Dir: <expr>`: directory of the cache file, anything `Into<PathBuf>`.
 * - `Policy: CompareFirst | Always`: `Always` skips the comparison and rewrites the file.
 * - `Config: <expr>`: a complete `memostash::CacheConfig` (or a reference to one), evaluated on
 *   every call. Cannot be mixed with the options above.
 *
 * The undecorated body stays available as `persisted_original_{fn}`, and
 * `persisted_path_{fn}()` returns the file the results go to.
 */
#[proc_macro_attribute]
pub fn save_result(attr: TokenStream, item: TokenStream) -> TokenStream {
    let options = parse_macro_input!(attr as SaveOptions);
    let func = parse_macro_input!(item as ItemFn);
    let sig = &func.sig;

    let fn_name = sig.ident.to_string();
    let original_id = Ident::new(&format!("persisted_original_{}", fn_name), sig.span());
    let path_id = Ident::new(&format!("persisted_path_{}", fn_name), sig.span());

    let input_names = match check_signature(sig, "save_result") {
        Ok((_, names)) => names,
        Err(e) => return e.to_compile_error().into(),
    };
    let return_type = match &sig.output {
        syn::ReturnType::Default => {
            return syn::Error::new(sig.span(), "Cannot persist a function without a return value!")
                .to_compile_error()
                .into()
        }
        syn::ReturnType::Type(_, ty) => ty.clone(),
    };
    let config = match options.config_expr() {
        Ok(config) => config,
        Err(e) => return e.to_compile_error().into(),
    };

    let mut renamed_fn = func.clone();
    renamed_fn.sig.ident = original_id.clone();

    let mut wrapper_sig = sig.clone();
    wrapper_sig.output = syn::parse_quote! { -> ::memostash::Result<#return_type> };

    let vis = &func.vis;

    quote::quote! {
        #renamed_fn

        #vis fn #path_id() -> ::std::path::PathBuf {
            let config = #config;
            <_ as ::std::borrow::Borrow<::memostash::CacheConfig>>::borrow(&config).cache_path(#fn_name)
        }

        #vis #wrapper_sig {
            let config = #config;
            ::memostash::persist::save_result(
                #fn_name,
                <_ as ::std::borrow::Borrow<::memostash::CacheConfig>>::borrow(&config),
                move || #original_id(#(#input_names),*),
            )
        }
    }
    .into()
}

fn check_signature(
    sig: &syn::Signature,
    attribute: &str,
) -> Result<(Vec<Box<syn::Type>>, Vec<Ident>), syn::Error> {
    if sig.inputs.is_empty() {
        return Ok((vec![], vec![]));
    }
    if let syn::FnArg::Receiver(_) = sig.inputs[0] {
        return Err(syn::Error::new(
            sig.span(),
            format!("Cannot {} methods!", attribute),
        ));
    }

    let mut types = vec![];
    let mut names = vec![];
    for a in &sig.inputs {
        if let syn::FnArg::Typed(ref arg) = a {
            types.push(arg.ty.clone());

            if let syn::Pat::Ident(patident) = &*arg.pat {
                names.push(patident.ident.clone());
            } else {
                return Err(syn::Error::new(
                    sig.span(),
                    format!("Cannot {} arbitrary patterns!", attribute),
                ));
            }
        }
    }
    Ok((types, names))
}
