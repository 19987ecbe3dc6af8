use bitflags::bitflags;

bitflags! {
    /// Modifiers of a declared member.
    ///
    /// ```
    /// use skeleton_key_core::MemberFlags;
    ///
    /// let constant = MemberFlags::STATIC | MemberFlags::FINAL | MemberFlags::CONSTANT;
    /// assert!(constant.contains(MemberFlags::FINAL));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemberFlags: u8 {
        /// Belongs to the class, not to instances.
        const STATIC = 1 << 0;
        /// Field may not be written after construction.
        const FINAL = 1 << 1;
        /// Not visible outside the declaring class.
        const PRIVATE = 1 << 2;
        /// Field holds a literal that member bodies may have captured directly.
        const CONSTANT = 1 << 3;
    }
}

impl MemberFlags {
    pub fn is_static(self) -> bool {
        self.contains(MemberFlags::STATIC)
    }

    pub fn is_final(self) -> bool {
        self.contains(MemberFlags::FINAL)
    }

    pub fn is_private(self) -> bool {
        self.contains(MemberFlags::PRIVATE)
    }
}
