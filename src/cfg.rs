#[doc(hidden)]
#[macro_export]
macro_rules! cfg_json {
    ($($item:item)*) => {
        $( #[cfg(feature = "json")] $item )*
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! cfg_chrono {
    ($($item:item)*) => {
        $( #[cfg(feature = "chrono")] $item )*
    }
}
