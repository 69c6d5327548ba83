// Crate-internal.
// ---

pub(crate) mod standard_programs {
    pub(crate) mod club_royale;
    pub(crate) mod crown_and_anchor;
}

pub(crate) mod standard_ports {
    pub(crate) mod standard_port_directory;
}

// Public exports.
// ---

pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported under `ext`.

    pub mod standard_programs {
        pub use crate::impl_ext::standard_programs::club_royale::*;
        pub use crate::impl_ext::standard_programs::crown_and_anchor::*;
    }

    pub mod standard_ports {
        pub use crate::impl_ext::standard_ports::standard_port_directory::*;
    }
}
