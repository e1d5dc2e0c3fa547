// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fixed message catalogue emitted by the pipeline.

use filmfest_domain::FileSlot;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{SubmissionError, SubmissionErrorCode};
use crate::progress::Stage;

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    Th,
    #[default]
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "th" | "th-th" => Ok(Self::Th),
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            _ => Err(format!("Unsupported locale: {s}")),
        }
    }
}

/// Appended to every permission-denied failure.
#[must_use]
pub const fn permission_hint(locale: Locale) -> &'static str {
    match locale {
        Locale::En => {
            "Please contact support: the storage or database access rules rejected this request."
        }
        Locale::Th => "กรุณาติดต่อผู้ดูแลระบบ: กฎการเข้าถึงของระบบจัดเก็บข้อมูลปฏิเสธคำขอนี้",
    }
}

const fn slot_label(slot: FileSlot, locale: Locale) -> &'static str {
    match (locale, slot) {
        (Locale::En, _) => slot.label(),
        (Locale::Th, FileSlot::Film) => "ภาพยนตร์",
        (Locale::Th, FileSlot::Poster) => "โปสเตอร์",
        (Locale::Th, FileSlot::Proof) => "เอกสารยืนยันสถานะ",
    }
}

/// Message shown alongside a progress event.
#[must_use]
pub const fn stage_message(stage: Stage, is_draft: bool, locale: Locale) -> &'static str {
    match (locale, stage, is_draft) {
        (Locale::En, Stage::Validating, _) => "Validating application...",
        (Locale::En, Stage::Uploading, _) => "Uploading files...",
        (Locale::En, Stage::Saving, true) => "Saving draft...",
        (Locale::En, Stage::Saving, false) => "Submitting application...",
        (Locale::En, Stage::Complete, true) => "Draft saved",
        (Locale::En, Stage::Complete, false) => "Application submitted",
        (Locale::En, Stage::Error, _) => "An error occurred",
        (Locale::Th, Stage::Validating, _) => "กำลังตรวจสอบข้อมูล...",
        (Locale::Th, Stage::Uploading, _) => "กำลังอัปโหลดไฟล์...",
        (Locale::Th, Stage::Saving, true) => "กำลังบันทึกแบบร่าง...",
        (Locale::Th, Stage::Saving, false) => "กำลังส่งใบสมัคร...",
        (Locale::Th, Stage::Complete, true) => "บันทึกแบบร่างเรียบร้อยแล้ว",
        (Locale::Th, Stage::Complete, false) => "ส่งใบสมัครเรียบร้อยแล้ว",
        (Locale::Th, Stage::Error, _) => "เกิดข้อผิดพลาด",
    }
}

/// Human readable, localized text for a pipeline failure.
///
/// Permission-denied failures always end with [`permission_hint`].
#[must_use]
pub fn error_message(error: &SubmissionError, locale: Locale) -> String {
    let detail: &str = &error.message;
    let base: String = match (locale, error.code) {
        (Locale::En, SubmissionErrorCode::MissingUserId) => {
            String::from("You must be signed in to save an application")
        }
        (Locale::Th, SubmissionErrorCode::MissingUserId) => {
            String::from("กรุณาเข้าสู่ระบบก่อนบันทึกใบสมัคร")
        }
        (
            Locale::En,
            SubmissionErrorCode::MissingApplicationId | SubmissionErrorCode::InvalidApplicationId,
        ) => String::from("The application form is missing its upload reference. Please reload the form"),
        (
            Locale::Th,
            SubmissionErrorCode::MissingApplicationId | SubmissionErrorCode::InvalidApplicationId,
        ) => String::from("แบบฟอร์มใบสมัครไม่สมบูรณ์ กรุณาโหลดแบบฟอร์มใหม่"),
        (Locale::En, SubmissionErrorCode::MissingFile(slot)) => {
            format!("{} file is required", slot_label(slot, locale))
        }
        (Locale::Th, SubmissionErrorCode::MissingFile(slot)) => {
            format!("กรุณาแนบไฟล์{}", slot_label(slot, locale))
        }
        (Locale::En, SubmissionErrorCode::InvalidFile(_)) => detail.to_string(),
        (Locale::Th, SubmissionErrorCode::InvalidFile(slot)) => {
            format!("ไฟล์{}ไม่ถูกต้อง: {detail}", slot_label(slot, locale))
        }
        (Locale::En, SubmissionErrorCode::ValidationFailed) => detail.to_string(),
        (Locale::Th, SubmissionErrorCode::ValidationFailed) => {
            format!("ข้อมูลไม่ครบถ้วน: {detail}")
        }
        (Locale::En, SubmissionErrorCode::UploadFailed) => format!("File upload failed: {detail}"),
        (Locale::Th, SubmissionErrorCode::UploadFailed) => {
            format!("อัปโหลดไฟล์ไม่สำเร็จ: {detail}")
        }
        (Locale::En, SubmissionErrorCode::PermissionDenied) => {
            String::from("Permission denied while saving the application")
        }
        (Locale::Th, SubmissionErrorCode::PermissionDenied) => {
            String::from("ไม่มีสิทธิ์บันทึกใบสมัคร")
        }
        (Locale::En, SubmissionErrorCode::SaveFailed) => {
            format!("Failed to save the application: {detail}")
        }
        (Locale::Th, SubmissionErrorCode::SaveFailed) => {
            format!("บันทึกใบสมัครไม่สำเร็จ: {detail}")
        }
        (Locale::En, SubmissionErrorCode::NotEditable | SubmissionErrorCode::DocumentNotFound) => {
            detail.to_string()
        }
        (Locale::Th, SubmissionErrorCode::NotEditable) => {
            String::from("ใบสมัครนี้ไม่สามารถแก้ไขได้แล้ว")
        }
        (Locale::Th, SubmissionErrorCode::DocumentNotFound) => String::from("ไม่พบใบสมัคร"),
    };

    if error.permission_denied {
        format!("{base}. {}", permission_hint(locale))
    } else {
        base
    }
}
