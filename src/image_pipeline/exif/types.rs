use ::exif::{Field, In, Tag, Value};

/// Fields decoded from the preview's EXIF block.
#[derive(Debug, Clone, Default)]
pub struct ExifTags {
    fields: Vec<Field>,
}

impl ExifTags {
    pub fn from_fields(fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// `tag` as recorded for the primary image.
    pub fn field(&self, tag: Tag) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.tag == tag && field.ifd_num == In::PRIMARY)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Focal length in whole millimetres, `None` on a zero denominator.
    pub fn focal_length(&self) -> Option<u32> {
        match &self.field(Tag::FocalLength)?.value {
            Value::Rational(values) => {
                let focal = values.first()?;
                focal.num.checked_div(focal.denom)
            }
            _ => None,
        }
    }
}
