/// Duplicate an [item](https://doc.rust-lang.org/nightly/reference/items.html) `$imp` for each type
/// `$Ty`, making it available within `$imp` under the alias `$Alias`.
///
/// Please use traits instead of this, where reasonable.
///
/// ```
/// trait Bits {
///     fn bits(self) -> u64;
/// }
///
/// weld_common::item_with! {F: f32, f64 => impl Bits for F {
///     fn bits(self) -> u64 {
///         f64::from(self).to_bits()
///     }
/// }}
///
/// fn main() {
///     assert_eq!(1.5f32.bits(), 1.5f64.bits());
/// }
/// ```
#[macro_export]
macro_rules! item_with {
    {$Alias:ident: $($Ty:ty),+ => $imp:item} => {
        $(
            const _: () = { // anonymous module
                type $Alias = $Ty;
                $imp
            };
        )+
    };
}
