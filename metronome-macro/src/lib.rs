use proc_macro::TokenStream;
use quote::quote;
use syn::{Expr, ExprLit, ItemFn, Lit, Meta, MetaNameValue};

/// Timer attribute macro for auto-registered async functions
///
/// Functions annotated with `#[timer]` are collected at link time and
/// scheduled when the scheduler starts.
///
/// # Examples
///
/// ```ignore
/// #[timer(once = "2s")]
/// async fn warmup() {
///     println!("Runs once, two seconds after start");
/// }
///
/// #[timer(every = "500ms", tag = "heartbeat")]
/// async fn heartbeat() {
///     println!("Runs every half second");
/// }
///
/// #[timer(every = "${jobs.sync.interval:30s}", enabled = "${jobs.sync.enabled:true}")]
/// async fn sync_remote() {
///     println!("Interval and on/off switch come from configuration");
/// }
/// ```
///
/// # Parameters
///
/// - `once`: fire a single time, the given delay after start
/// - `every`: fire repeatedly at the given interval
/// - `tag`: timer tag used for `stop` and in failure reports (defaults to
///   the function name)
/// - `enabled`: enable/disable the timer (boolean or config placeholder)
///
/// Exactly one of `once` or `every` is required. Delay and interval values
/// are duration expressions (`"500ms"`, `"2s"`, `"10m"`) or `${key:default}`
/// config placeholders resolving to one.
#[proc_macro_attribute]
pub fn timer(args: TokenStream, input: TokenStream) -> TokenStream {
    if let Ok(input_fn) = syn::parse::<ItemFn>(input) {
        return handle_timer_function(args, input_fn);
    }

    panic!("timer macro can only be applied to standalone async functions");
}

fn handle_timer_function(args: TokenStream, input_fn: ItemFn) -> TokenStream {
    let attr_args = syn::parse_macro_input!(args with syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated);

    let fn_name = &input_fn.sig.ident;
    let fn_vis = &input_fn.vis;
    let fn_sig = &input_fn.sig;
    let fn_block = &input_fn.block;

    if input_fn.sig.asyncness.is_none() {
        panic!("timer function '{}' must be async", fn_name);
    }

    let (mode, schedule, tag, enabled) = parse_timer_args(&attr_args, &fn_name.to_string());

    // Generate unique registration function name
    let register_fn_name = syn::Ident::new(
        &format!("__register_timer_{}", fn_name),
        fn_name.span(),
    );

    let expanded = quote! {
        #fn_vis #fn_sig {
            #fn_block
        }

        // Auto-registration using linkme
        #[::metronome::metronome_runtime::linkme::distributed_slice(::metronome::metronome_runtime::TIMER_DEFS)]
        #[linkme(crate = ::metronome::metronome_runtime::linkme)]
        fn #register_fn_name() -> ::metronome::metronome_runtime::TimerDef {
            ::metronome::metronome_runtime::TimerDef {
                name: stringify!(#fn_name),
                mode: #mode,
                schedule: #schedule,
                tag: #tag,
                enabled: #enabled,
                handler: || -> ::std::pin::Pin<::std::boxed::Box<dyn ::std::future::Future<Output = ()> + ::std::marker::Send>> {
                    ::std::boxed::Box::pin(#fn_name())
                },
            }
        }
    };

    TokenStream::from(expanded)
}

fn parse_timer_args(
    attr_args: &syn::punctuated::Punctuated<Meta, syn::Token![,]>,
    fn_name: &str,
) -> (String, String, String, String) {
    let mut mode_schedule: Option<(String, String)> = None;
    let mut tag = None;
    let mut enabled = None;

    for arg in attr_args {
        let Meta::NameValue(MetaNameValue { path, value, .. }) = arg else {
            panic!(
                "timer attributes on '{}' must be key = \"value\" pairs",
                fn_name
            );
        };
        let key = path
            .get_ident()
            .map(|ident| ident.to_string())
            .unwrap_or_default();
        let literal = match value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => s.value(),
            _ => panic!(
                "timer attribute '{}' on '{}' expects a string literal",
                key, fn_name
            ),
        };

        match key.as_str() {
            "once" | "every" => {
                if mode_schedule.is_some() {
                    panic!(
                        "timer '{}' accepts exactly one of 'once' or 'every'",
                        fn_name
                    );
                }
                mode_schedule = Some((key, literal));
            }
            "tag" => tag = Some(literal),
            "enabled" => enabled = Some(literal),
            other => panic!("unknown timer attribute '{}' on '{}'", other, fn_name),
        }
    }

    let (mode, schedule) = mode_schedule.unwrap_or_else(|| {
        panic!(
            "timer '{}' requires 'once = \"...\"' or 'every = \"...\"'",
            fn_name
        )
    });

    (
        mode,
        schedule,
        tag.unwrap_or_else(|| fn_name.to_string()),
        enabled.unwrap_or_else(|| "true".to_string()),
    )
}
