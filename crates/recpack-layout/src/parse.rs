use tracing::debug;

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::kind::{ByteOrder, FieldKind, BYTES, PAD};
use crate::layout::{Field, Layout};

/// Parse a layout string with the default [`LayoutConfig`].
///
/// ```
/// use recpack_layout::{describe_layout, FieldKind};
///
/// let layout = describe_layout("i3sf").unwrap();
/// assert_eq!(layout.size(), 11);
/// assert_eq!(layout.field(1).unwrap().kind, FieldKind::Bytes(3));
/// ```
pub fn describe_layout(spec: &str) -> Result<Layout> {
    describe_layout_with_config(spec, &LayoutConfig::default())
}

/// Parse a layout string with explicit limits.
pub fn describe_layout_with_config(spec: &str, config: &LayoutConfig) -> Result<Layout> {
    let src = spec.as_bytes();
    let (byte_order, aligned, mut pos) = match src.first() {
        Some(b'@') => (ByteOrder::native(), true, 1),
        Some(b'=') => (ByteOrder::native(), false, 1),
        Some(b'<') => (ByteOrder::Little, false, 1),
        Some(b'>') | Some(b'!') => (ByteOrder::Big, false, 1),
        _ => (ByteOrder::NETWORK, false, 0),
    };

    let mut builder = Builder::new(aligned, config);

    while pos < src.len() {
        if src[pos].is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let count = parse_count(src, &mut pos)?;

        let Some(&code) = src.get(pos) else {
            return Err(LayoutError::invalid(
                start,
                "count is not followed by a field kind",
            ));
        };
        let code_pos = pos;
        pos += 1;

        match code {
            BYTES => builder.push(FieldKind::Bytes(count.unwrap_or(1)), start)?,
            PAD => builder.pad(count.unwrap_or(1), start)?,
            b'@' | b'=' | b'<' | b'>' | b'!' => {
                return Err(LayoutError::invalid(
                    code_pos,
                    "byte order must be the first character",
                ));
            }
            c if c.is_ascii_whitespace() => {
                return Err(LayoutError::invalid(
                    code_pos,
                    "whitespace between count and field kind",
                ));
            }
            other => {
                let kind = FieldKind::from_code(other).ok_or_else(|| {
                    let shown = spec[code_pos..].chars().next().unwrap_or('?');
                    LayoutError::invalid(code_pos, format!("unrecognized field kind {shown:?}"))
                })?;
                match count.unwrap_or(1) {
                    // A zero repeat carries no value but still aligns.
                    0 => builder.align_to(kind.alignment(), start)?,
                    repeat => {
                        for _ in 0..repeat {
                            builder.push(kind, start)?;
                        }
                    }
                }
            }
        }
    }

    let layout = builder.finish(spec, byte_order);
    debug!(
        spec,
        size = layout.size(),
        fields = layout.field_count(),
        "parsed record layout"
    );
    Ok(layout)
}

/// Read an optional decimal count starting at `pos`.
fn parse_count(src: &[u8], pos: &mut usize) -> Result<Option<usize>> {
    let start = *pos;
    let mut value: Option<usize> = None;
    while let Some(&c) = src.get(*pos) {
        if !c.is_ascii_digit() {
            break;
        }
        let digit = usize::from(c - b'0');
        let next = value
            .unwrap_or(0)
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| LayoutError::invalid(start, "count overflows"))?;
        value = Some(next);
        *pos += 1;
    }
    Ok(value)
}

struct Builder<'a> {
    aligned: bool,
    config: &'a LayoutConfig,
    fields: Vec<Field>,
    offset: usize,
}

impl<'a> Builder<'a> {
    fn new(aligned: bool, config: &'a LayoutConfig) -> Self {
        Self {
            aligned,
            config,
            fields: Vec::new(),
            offset: 0,
        }
    }

    fn push(&mut self, kind: FieldKind, position: usize) -> Result<()> {
        if self.fields.len() >= self.config.max_fields {
            return Err(LayoutError::invalid(
                position,
                format!("more than {} fields", self.config.max_fields),
            ));
        }
        self.align_to(kind.alignment(), position)?;
        let offset = self.offset;
        self.advance(kind.width(), position)?;
        self.fields.push(Field { kind, offset });
        Ok(())
    }

    fn pad(&mut self, count: usize, position: usize) -> Result<()> {
        self.advance(count, position)
    }

    fn align_to(&mut self, alignment: usize, position: usize) -> Result<()> {
        if !self.aligned || alignment <= 1 {
            return Ok(());
        }
        let padding = (alignment - self.offset % alignment) % alignment;
        self.advance(padding, position)
    }

    fn advance(&mut self, bytes: usize, position: usize) -> Result<()> {
        let max = self.config.max_record_size;
        match self.offset.checked_add(bytes) {
            Some(end) if end <= max => {
                self.offset = end;
                Ok(())
            }
            _ => Err(LayoutError::invalid(
                position,
                format!("record size exceeds {max} bytes"),
            )),
        }
    }

    fn finish(self, spec: &str, byte_order: ByteOrder) -> Layout {
        Layout::new(spec, byte_order, self.aligned, self.fields, self.offset)
    }
}
