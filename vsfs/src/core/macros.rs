// SPDX-License-Identifier: MIT

/// Generates the `From` conversions between the layered error enums.
///
/// - `top`: each stage error converts into the given top-level variant
/// - `str_into`: `&'static str` converts into `Other(msg)` of each listed type and of the top type
/// - `sub`: a lower-level error converts into the named variant of a higher-level one
#[macro_export]
macro_rules! fs_error_wiring {
    (
        top => $top:ty {
            $($top_src:ty : $top_variant:ident),+ $(,)?
        },
        str_into => [ $($str_tgt:ty),* $(,)? ],
        sub => {
            $($src_sub:ty => [ $($dst_sub:ident::$dst_variant:ident),+ ] ),* $(,)?
        } $(,)?
    ) => {
        $crate::__impl_into_fserror!{ $top; $( $top_src => $top_variant ),+ }
        $crate::__impl_str_into_errors!{ $top; $( $str_tgt ),* }
        $crate::__impl_sub_into_error!{ $( $src_sub => [ $( $dst_sub :: $dst_variant ),+ ] ),* }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __impl_into_fserror {
    ($top:ty; $($t:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$t> for $top {
                #[inline]
                fn from(e: $t) -> Self { <$top>::$variant(e) }
            }
        )+
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __impl_str_into_errors {
    ($top:ty; $($t:ty),* $(,)?) => {
        $(
            impl From<&'static str> for $t {
                #[inline]
                fn from(msg: &'static str) -> Self { <$t>::Other(msg) }
            }
        )*
        impl From<&'static str> for $top {
            #[inline]
            fn from(msg: &'static str) -> Self { <$top>::Other(msg) }
        }
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __impl_sub_into_error {
    ($($src:ty => [ $( $dst:ident::$variant:ident ),+ ] ),* $(,)?) => {
        $(
            $(
                impl From<$src> for $dst {
                    #[inline]
                    fn from(e: $src) -> Self { <$dst>::$variant(e) }
                }
            )+
        )*
    }
}

/// Implements `Display` (message, detail, `caused by:` chain) and `std::error::Error`
/// for error types exposing `msg()`, `fmt_detail()` and `source()`.
#[doc(hidden)]
#[macro_export]
macro_rules! __impl_error_display {
    ($($t:ty),+ $(,)?) => {
        $(
            impl ::core::fmt::Display for $t {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    write!(f, "{}", self.msg())?;
                    self.fmt_detail(f)?;
                    let mut current = self.source();
                    while let Some(src) = current {
                        write!(f, "\n  caused by: {}", src.msg())?;
                        src.fmt_detail(f)?;
                        current = src.source();
                    }
                    Ok(())
                }
            }

            impl std::error::Error for $t {}
        )+
    }
}
