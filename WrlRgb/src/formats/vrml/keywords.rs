//! Literal tokens of the recognized VRML subset

/// First header token
pub const VRML: &str = "#VRML";
/// Second header token
pub const VERSION: &str = "V2.0";
/// Third header token
pub const CHARSET: &str = "utf8";

/// Header tokens in the order they must appear.
pub const HEADER: [&str; 3] = [VRML, VERSION, CHARSET];

pub const DEF: &str = "DEF";
pub const TRANSFORM: &str = "Transform";
pub const DIFFUSE_COLOR: &str = "diffuseColor";
