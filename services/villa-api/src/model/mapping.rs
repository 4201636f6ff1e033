//! Entity <-> shape conversions.
//!
//! Timestamps never travel on the wire; shapes mapped into entities are stamped
//! with the current time and the store decides which stamp it keeps.
use super::{Villa, VillaNumber};
use chrono::Utc;
use villa_model::{
    VillaCreateDto, VillaDto, VillaNumberCreateDto, VillaNumberDto, VillaNumberUpdateDto,
    VillaUpdateDto,
};

impl From<Villa> for VillaDto {
    fn from(villa: Villa) -> Self {
        Self {
            id: villa.id,
            name: villa.name,
            sqft: villa.sqft,
            occupancy: villa.occupancy,
            rate: villa.rate,
            details: villa.details,
            image_url: villa.image_url,
            amenity: villa.amenity,
        }
    }
}

impl From<Villa> for VillaUpdateDto {
    fn from(villa: Villa) -> Self {
        Self {
            id: villa.id,
            name: villa.name,
            sqft: villa.sqft,
            occupancy: villa.occupancy,
            rate: villa.rate,
            details: villa.details,
            image_url: villa.image_url,
            amenity: villa.amenity,
        }
    }
}

impl From<VillaCreateDto> for Villa {
    fn from(dto: VillaCreateDto) -> Self {
        let now = Utc::now();
        Self {
            id: dto.id,
            name: dto.name,
            sqft: dto.sqft,
            occupancy: dto.occupancy,
            rate: dto.rate,
            details: dto.details,
            image_url: dto.image_url,
            amenity: dto.amenity,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<VillaUpdateDto> for Villa {
    fn from(dto: VillaUpdateDto) -> Self {
        let now = Utc::now();
        Self {
            id: dto.id,
            name: dto.name,
            sqft: dto.sqft,
            occupancy: dto.occupancy,
            rate: dto.rate,
            details: dto.details,
            image_url: dto.image_url,
            amenity: dto.amenity,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<VillaNumber> for VillaNumberDto {
    fn from(number: VillaNumber) -> Self {
        Self {
            villa_no: number.villa_no,
            villa_id: number.villa_id,
            details: number.details,
            special_details: number.special_details,
        }
    }
}

impl From<VillaNumber> for VillaNumberUpdateDto {
    fn from(number: VillaNumber) -> Self {
        Self {
            villa_no: number.villa_no,
            villa_id: number.villa_id,
            details: number.details,
            special_details: number.special_details,
        }
    }
}

impl From<VillaNumberCreateDto> for VillaNumber {
    fn from(dto: VillaNumberCreateDto) -> Self {
        let now = Utc::now();
        Self {
            villa_no: dto.villa_no,
            villa_id: dto.villa_id,
            details: dto.details,
            special_details: dto.special_details,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<VillaNumberUpdateDto> for VillaNumber {
    fn from(dto: VillaNumberUpdateDto) -> Self {
        let now = Utc::now();
        Self {
            villa_no: dto.villa_no,
            villa_id: dto.villa_id,
            details: dto.details,
            special_details: dto.special_details,
            created_at: now,
            updated_at: now,
        }
    }
}
