// ─── triggers! ───────────────────────────────────────────────────────────────
//
// Turns a list of `method => "pattern" [options]` declarations into the
// `Vec<TriggerSpec<Self>>` returned by `Handler::triggers`.

/// Declares the trigger methods of a handler.
///
/// Must be used inside `impl Handler for T`, where `Self` names the handler
/// type. Every entry binds an inherent `async fn name(&self, ctx:
/// TriggerContext) -> HandlerResult` to a pattern. `///` comments on an entry
/// become the trigger's help description (first non-blank line).
///
/// Options go in square brackets after the pattern:
///
/// | option                | effect                                   |
/// |-----------------------|------------------------------------------|
/// | `room = "^@random"`   | only accept messages from matching rooms |
/// | `fallback`            | only fire when nothing else matched      |
/// | `fallback = false`    | explicit flag                            |
/// | `description = "..."` | description, overriding the doc comment  |
///
/// # Example
///
/// ```rust,ignore
/// impl Handler for Foo {
///     fn triggers(&self) -> Vec<TriggerSpec<Self>> {
///         triggers! {
///             /// test hi
///             hi => "^hi",
///             goodbye => "^goodbye" [room = "^@random"],
///             missing => "^foobarbaz" [fallback],
///         }
///     }
/// }
/// ```
#[macro_export]
macro_rules! triggers {
    (@opt $spec:ident, room = $value:expr) => {
        $spec.room($value)
    };
    (@opt $spec:ident, fallback) => {
        $spec.fallback(true)
    };
    (@opt $spec:ident, fallback = $value:expr) => {
        $spec.fallback($value)
    };
    (@opt $spec:ident, description = $value:expr) => {
        $spec.description($value)
    };

    (
        $(
            $(#[doc = $doc:literal])*
            $method:ident => $pattern:literal
            $([ $($key:ident $(= $value:literal)?),* $(,)? ])?
        ),* $(,)?
    ) => {
        ::std::vec![$({
            let spec = $crate::trigger::TriggerSpec::<Self>::new(
                ::std::stringify!($method),
                $pattern,
                |this: ::std::sync::Arc<Self>,
                 ctx: $crate::context::TriggerContext|
                 -> $crate::BoxFuture<'static, $crate::handler::HandlerResult> {
                    ::std::boxed::Box::pin(async move { this.$method(ctx).await })
                },
            );
            $($(
                let spec = $crate::triggers!(@opt spec, $key $(= $value)?);
            )*)?
            spec.docs(&[$($doc),*])
        }),*]
    };
}
