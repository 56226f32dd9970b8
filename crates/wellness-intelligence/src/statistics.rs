// ABOUTME: Trend statistics over score history: least-squares slope, fit quality, dispersion
// ABOUTME: Regression runs on day offsets so gaps in history do not distort the slope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::cast_precision_loss)] // Safe: point counts and day offsets are small

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wellness_core::errors::{AppError, AppResult};

/// One observation on a day axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Days since the first observation
    pub day: f64,
    /// Observed value
    pub value: f64,
}

impl TrendPoint {
    /// Build points from dated values, using the earliest date as day zero
    ///
    /// Input order does not matter; output is sorted by day.
    #[must_use]
    pub fn from_dated(values: &[(NaiveDate, f64)]) -> Vec<Self> {
        let Some(origin) = values.iter().map(|(date, _)| *date).min() else {
            return Vec::new();
        };
        let mut points: Vec<Self> = values
            .iter()
            .filter(|(_, value)| value.is_finite())
            .map(|(date, value)| Self {
                day: (*date - origin).num_days() as f64,
                value: *value,
            })
            .collect();
        points.sort_by(|a, b| a.day.total_cmp(&b.day));
        points
    }
}

/// Least-squares fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Change per day
    pub slope: f64,
    /// Value at day zero
    pub intercept: f64,
    /// Coefficient of determination (0-1)
    pub r_squared: f64,
}

/// Statistical helpers used by the projector and the consistency metric
pub struct StatisticalAnalyzer;

impl StatisticalAnalyzer {
    /// Ordinary least-squares regression of value on day
    ///
    /// # Errors
    ///
    /// Returns an error with fewer than two points or when every point falls on the same day
    pub fn linear_regression(points: &[TrendPoint]) -> AppResult<RegressionResult> {
        if points.len() < 2 {
            return Err(AppError::invalid_input(format!(
                "Insufficient data points for regression: need at least 2, got {}",
                points.len()
            )));
        }

        let n = points.len() as f64;
        let sum_x = points.iter().map(|p| p.day).sum::<f64>();
        let sum_y = points.iter().map(|p| p.value).sum::<f64>();
        let sum_xx = points.iter().map(|p| p.day * p.day).sum::<f64>();
        let sum_xy = points.iter().map(|p| p.day * p.value).sum::<f64>();
        let sum_yy = points.iter().map(|p| p.value * p.value).sum::<f64>();

        let mean_x = sum_x / n;
        let mean_y = sum_y / n;

        let denominator = (n * mean_x).mul_add(-mean_x, sum_xx);
        if denominator.abs() < f64::EPSILON {
            return Err(AppError::invalid_input(
                "Cannot calculate regression: zero variance in x",
            ));
        }

        let numerator = (n * mean_x).mul_add(-mean_y, sum_xy);
        let slope = numerator / denominator;
        let intercept = slope.mul_add(-mean_x, mean_y);

        let y_variance = (n * mean_y).mul_add(-mean_y, sum_yy);
        let r_squared = if y_variance.abs() < f64::EPSILON {
            0.0
        } else {
            (numerator * numerator) / (denominator * y_variance)
        };

        Ok(RegressionResult {
            slope,
            intercept,
            r_squared: r_squared.clamp(0.0, 1.0),
        })
    }

    /// Slope per day, or `0` when there is not enough history to fit a line
    #[must_use]
    pub fn slope_or_flat(points: &[TrendPoint]) -> f64 {
        Self::linear_regression(points)
            .map(|regression| regression.slope)
            .ok()
            .filter(|slope| slope.is_finite())
            .unwrap_or(0.0)
    }

    /// Population standard deviation; `0` for fewer than two values
    #[must_use]
    pub fn std_dev(values: &[f64]) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        variance.sqrt()
    }
}
