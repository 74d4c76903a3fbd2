mod member_lookup;
mod record_layout;
mod type_layout;
mod type_layout_cache;

use data_units::ByteUnits;
pub use member_lookup::MemberLocation;
pub use record_layout::*;
use target::AbiProfile;
pub use type_layout::{Completeness, TypeLayout};
pub use type_layout_cache::TypeLayoutCache;

/// Layouts an ABI profile can answer without looking at any record.
pub trait TargetLayout {
    fn pointer_layout(&self) -> TypeLayout;
    fn base_type_layout(&self, name: &str) -> Option<TypeLayout>;
    fn empty_record_size(&self) -> ByteUnits;
}

impl TargetLayout for AbiProfile {
    fn pointer_layout(&self) -> TypeLayout {
        TypeLayout::new(self.pointer_size, self.pointer_alignment)
    }

    fn base_type_layout(&self, name: &str) -> Option<TypeLayout> {
        self.base_type(name)
            .map(|primitive| TypeLayout::new(primitive.size, primitive.alignment))
    }

    fn empty_record_size(&self) -> ByteUnits {
        self.empty_record_size
    }
}

#[test]
fn test_profile_layouts() {
    let profile = AbiProfile::lp64();

    assert_eq!(profile.pointer_layout(), TypeLayout::basic(ByteUnits::of(8)));
    assert_eq!(
        profile.base_type_layout("short unsigned int"),
        Some(TypeLayout::basic(ByteUnits::of(2)))
    );
    assert_eq!(profile.base_type_layout("__int128"), None);
    assert_eq!(profile.empty_record_size(), ByteUnits::of(1));
}
