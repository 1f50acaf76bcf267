//! Spreadsheet-friendly CSV export of recorded interviews.

use std::borrow::Cow;

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use chrono::Utc;
use interview_store_db::ExportData;
use tracing::info;

use crate::ApiResult;
use crate::session::Session;
use crate::store::Store;

/// Lets spreadsheet programs detect UTF-8 for the Thai text.
const BOM: &str = "\u{feff}";

const FIXED_COLUMNS: [&str; 9] = [
    "รหัสการสัมภาษณ์",
    "รหัสนักศึกษา",
    "ชื่อนักศึกษา",
    "หลักสูตร",
    "คณะ",
    "วิทยาเขต",
    "ระดับ",
    "ผู้สัมภาษณ์",
    "วันที่สัมภาษณ์",
];

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn push_record<'a>(out: &mut String, fields: impl IntoIterator<Item = Cow<'a, str>>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&csv_field(&field));
    }
    out.push_str("\r\n");
}

/// One header row, then one row per interview with an answer column per
/// catalog question. Unanswered questions are empty.
pub(crate) fn render_csv(data: &ExportData) -> String {
    let mut out = String::from(BOM);

    let mut headers: Vec<Cow<'_, str>> = FIXED_COLUMNS.iter().map(|h| Cow::Borrowed(*h)).collect();
    headers.extend(
        data.questions
            .iter()
            .map(|q| Cow::Owned(format!("{}. {}", q.question_id, q.question_text))),
    );
    push_record(&mut out, headers);

    for row in &data.rows {
        let fixed = [
            Cow::Owned(row.interview_id.to_string()),
            Cow::Borrowed(row.student_id.as_str()),
            Cow::Borrowed(row.student_name.as_str()),
            Cow::Borrowed(row.program.as_str()),
            Cow::Borrowed(row.faculty.as_str()),
            Cow::Borrowed(row.campus.as_str()),
            Cow::Borrowed(row.level.as_str()),
            Cow::Borrowed(row.interviewer_name.as_str()),
            Cow::Owned(row.interview_date.format("%Y-%m-%d %H:%M:%S").to_string()),
        ];
        let answers = data.questions.iter().map(|q| {
            Cow::Borrowed(
                row.answers
                    .get(&q.question_id)
                    .map(String::as_str)
                    .unwrap_or_default(),
            )
        });
        push_record(&mut out, fixed.into_iter().chain(answers));
    }
    out
}

pub(crate) async fn get(store: web::Data<Store>, Session(actor): Session) -> ApiResult {
    let data = store
        .db_operation(move |db| Ok(db.export_rows(actor.scope())?))
        .await?;
    let body = render_csv(&data);
    let filename = format!("interview_data_{}.csv", Utc::now().timestamp());
    info!("Exporting {} interviews as {filename}", data.rows.len());

    Ok(HttpResponse::Ok()
        .content_type(mime::TEXT_CSV_UTF_8)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(body))
}
