/// Texture resource payload

/// A loaded texture: dimensions plus raw RGBA8 pixel data.
///
/// Upload to a device image is backend work; the resource level only
/// carries the decoded pixels.
pub struct TextureResource {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Tightly-packed RGBA8 pixels (`width * height * 4` bytes)
    pub pixels: Vec<u8>,
}
