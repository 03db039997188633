use derive_more::Display;

macro_rules! new_handle {
    ($name: ident, $prefix: literal) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
        #[display("{}#{}", $prefix, _0)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub fn from_usize(idx: usize) -> Self {
                Self(u32::try_from(idx).expect("handle index overflowed"))
            }

            #[inline]
            pub fn into_usize(self) -> usize {
                self.0 as usize
            }
        }
    };
}

new_handle!(Element, "element");
new_handle!(AnnotationKind, "annotation");

#[test]
fn handles_compare_by_identity() {
    let a = Element::from_raw(3);
    let b = Element::from_usize(3);
    assert_eq!(a, b);
    assert_ne!(a, Element::from_raw(4));
    assert_eq!(a.into_usize(), 3);
    assert_eq!(a.to_string(), "element#3");
    assert_eq!(AnnotationKind::from_raw(7).to_string(), "annotation#7");
}
