//! Conversions between read shapes and their create/update shapes.
//!
//! # Purpose
//! Presentation code edits a record by fetching its read shape and turning it
//! into the shape the API accepts for the next call. Each direction is spelled
//! out so the settable fields of every shape stay explicit.
use crate::villa::{VillaCreateDto, VillaDto, VillaUpdateDto};
use crate::villa_number::{VillaNumberCreateDto, VillaNumberDto, VillaNumberUpdateDto};

impl From<VillaDto> for VillaCreateDto {
    // A create shape never carries an identity.
    fn from(dto: VillaDto) -> Self {
        Self {
            id: 0,
            name: dto.name,
            sqft: dto.sqft,
            occupancy: dto.occupancy,
            rate: dto.rate,
            details: dto.details,
            image_url: dto.image_url,
            amenity: dto.amenity,
        }
    }
}

impl From<VillaCreateDto> for VillaDto {
    fn from(dto: VillaCreateDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            sqft: dto.sqft,
            occupancy: dto.occupancy,
            rate: dto.rate,
            details: dto.details,
            image_url: dto.image_url,
            amenity: dto.amenity,
        }
    }
}

impl From<VillaDto> for VillaUpdateDto {
    fn from(dto: VillaDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            sqft: dto.sqft,
            occupancy: dto.occupancy,
            rate: dto.rate,
            details: dto.details,
            image_url: dto.image_url,
            amenity: dto.amenity,
        }
    }
}

impl From<VillaUpdateDto> for VillaDto {
    fn from(dto: VillaUpdateDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            sqft: dto.sqft,
            occupancy: dto.occupancy,
            rate: dto.rate,
            details: dto.details,
            image_url: dto.image_url,
            amenity: dto.amenity,
        }
    }
}

impl From<VillaNumberDto> for VillaNumberCreateDto {
    fn from(dto: VillaNumberDto) -> Self {
        Self {
            villa_no: dto.villa_no,
            villa_id: dto.villa_id,
            details: dto.details,
            special_details: dto.special_details,
        }
    }
}

impl From<VillaNumberCreateDto> for VillaNumberDto {
    fn from(dto: VillaNumberCreateDto) -> Self {
        Self {
            villa_no: dto.villa_no,
            villa_id: dto.villa_id,
            details: dto.details,
            special_details: dto.special_details,
        }
    }
}

impl From<VillaNumberDto> for VillaNumberUpdateDto {
    fn from(dto: VillaNumberDto) -> Self {
        Self {
            villa_no: dto.villa_no,
            villa_id: dto.villa_id,
            details: dto.details,
            special_details: dto.special_details,
        }
    }
}

impl From<VillaNumberUpdateDto> for VillaNumberDto {
    fn from(dto: VillaNumberUpdateDto) -> Self {
        Self {
            villa_no: dto.villa_no,
            villa_id: dto.villa_id,
            details: dto.details,
            special_details: dto.special_details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_shape_to_create_shape_drops_identity() {
        let dto = VillaDto {
            id: 12,
            name: "Cabin".to_string(),
            sqft: 300,
            occupancy: 2,
            rate: 80.0,
            details: String::new(),
            image_url: String::new(),
            amenity: "Fireplace".to_string(),
        };
        let create = VillaCreateDto::from(dto.clone());
        assert_eq!(create.id, 0);
        assert_eq!(create.amenity, "Fireplace");

        let update = VillaUpdateDto::from(dto.clone());
        assert_eq!(VillaDto::from(update), dto);
    }

    #[test]
    fn villa_number_update_shape_keeps_key_and_reference() {
        let dto = VillaNumberDto {
            villa_no: 204,
            villa_id: 3,
            details: "Second floor".to_string(),
            special_details: Some("Balcony".to_string()),
        };
        let update = VillaNumberUpdateDto::from(dto.clone());
        assert_eq!(update.villa_no, 204);
        assert_eq!(update.villa_id, 3);
        assert_eq!(VillaNumberDto::from(update), dto);
    }
}
