//! Product reviews.

use serde::{Deserialize, Serialize};
use shopcore_foundation::{Error, Id, Result, validate};
use shopcore_storage::Entity;

/// Handle to a live review.
pub type ReviewId = Id<ReviewRec>;

/// Star rating of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewRating {
    /// One star.
    One,
    /// Two stars.
    Two,
    /// Three stars.
    Three,
    /// Four stars.
    Four,
    /// Five stars.
    Five,
}

impl ReviewRating {
    /// Returns the rating as a star count.
    #[must_use]
    pub fn stars(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
        }
    }
}

impl TryFrom<u8> for ReviewRating {
    type Error = Error;

    fn try_from(stars: u8) -> Result<Self> {
        match stars {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            5 => Ok(Self::Five),
            _ => Err(Error::out_of_range("rating", "must be between 1 and 5")),
        }
    }
}

/// A review's attribute state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRec {
    pub(crate) rating: ReviewRating,
    pub(crate) comment: Option<String>,
}

impl ReviewRec {
    /// Returns the star rating.
    #[must_use]
    pub fn rating(&self) -> ReviewRating {
        self.rating
    }

    /// Returns the free-text comment, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

impl Entity for ReviewRec {
    const KIND: &'static str = "review";
    const EXTENT: &'static str = "reviews";
}

/// Candidate state for a new review.
#[derive(Debug, Clone)]
pub struct ReviewParams {
    /// Star rating.
    pub rating: ReviewRating,
    /// Optional free-text comment, at most 1000 characters when present.
    pub comment: Option<String>,
}

impl ReviewParams {
    /// Validates the candidate.
    ///
    /// # Errors
    /// Returns `OutOfRange` when the comment is blank or too long.
    pub fn validate(&self) -> Result<()> {
        if let Some(comment) = &self.comment {
            validate::length_between("comment", comment, 1, 1000)?;
        }
        Ok(())
    }

    pub(crate) fn into_record(self) -> ReviewRec {
        ReviewRec {
            rating: self.rating,
            comment: self.comment,
        }
    }
}
