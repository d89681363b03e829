//! Integration tests for courses, financing options, professionals and
//! library files.

use assert_matches::assert_matches;
use sqlx::PgPool;

use campus_db::models::course::{CreateCourse, UpdateCourse};
use campus_db::models::financing::{CreateFinancingOption, UpdateFinancingOption};
use campus_db::models::library_file::CreateLibraryFile;
use campus_db::models::professional::{CreateProfessional, UpdateProfessional};
use campus_db::repositories::{CourseRepo, FinancingRepo, LibraryFileRepo, ProfessionalRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_course(slug: &str, published: bool) -> CreateCourse {
    CreateCourse {
        slug: slug.to_string(),
        title: "Diplomado en nutrición".to_string(),
        summary: None,
        description: None,
        price: 1_250_000,
        currency: None,
        duration_hours: Some(120),
        modality: Some("virtual".to_string()),
        image_url: None,
        is_published: Some(published),
    }
}

fn new_professional(name: &str, sort_order: i32, active: bool) -> CreateProfessional {
    CreateProfessional {
        name: name.to_string(),
        title: "Nutricionista".to_string(),
        bio: None,
        specialties: vec!["Deportiva".to_string()],
        photo_url: None,
        whatsapp_phone: Some("573001234567".to_string()),
        email: None,
        sort_order: Some(sort_order),
        is_active: Some(active),
    }
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_course_defaults_and_visibility(pool: PgPool) {
    let draft = CourseRepo::create(&pool, &new_course("borrador", false)).await.unwrap();
    let live = CourseRepo::create(&pool, &new_course("nutricion", true)).await.unwrap();

    assert_eq!(live.currency, "COP");
    assert_eq!(live.summary, "");

    let public = CourseRepo::list(&pool, true).await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].id, live.id);
    assert_eq!(CourseRepo::list(&pool, false).await.unwrap().len(), 2);

    assert!(CourseRepo::find_published_by_slug(&pool, "borrador")
        .await
        .unwrap()
        .is_none());
    assert!(CourseRepo::find_by_id(&pool, draft.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_slug_is_rejected(pool: PgPool) {
    CourseRepo::create(&pool, &new_course("nutricion", true)).await.unwrap();
    let err = CourseRepo::create(&pool, &new_course("nutricion", false))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        sqlx::Error::Database(ref db) if db.constraint() == Some("uq_courses_slug")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_course_update_is_partial(pool: PgPool) {
    let course = CourseRepo::create(&pool, &new_course("nutricion", false)).await.unwrap();
    let updated = CourseRepo::update(
        &pool,
        course.id,
        &UpdateCourse {
            price: Some(990_000),
            is_published: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.price, 990_000);
    assert!(updated.is_published);
    assert_eq!(updated.title, course.title);
    assert!(CourseRepo::update(&pool, 9999, &UpdateCourse::default())
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Financing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_financing_options_follow_course(pool: PgPool) {
    let course = CourseRepo::create(&pool, &new_course("nutricion", true)).await.unwrap();
    for (label, installments, active) in [("12 cuotas", 12, true), ("3 cuotas", 3, true), ("24", 24, false)] {
        FinancingRepo::create(
            &pool,
            course.id,
            &CreateFinancingOption {
                label: label.to_string(),
                installments,
                monthly_rate_bps: None,
                is_active: Some(active),
            },
        )
        .await
        .unwrap();
    }

    let active = FinancingRepo::list_for_course(&pool, course.id, true).await.unwrap();
    let plans: Vec<i32> = active.iter().map(|o| o.installments).collect();
    assert_eq!(plans, vec![3, 12]);
    assert_eq!(active[0].monthly_rate_bps, 0);

    let updated = FinancingRepo::update(
        &pool,
        active[0].id,
        &UpdateFinancingOption {
            monthly_rate_bps: Some(150),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.monthly_rate_bps, 150);

    assert!(CourseRepo::delete(&pool, course.id).await.unwrap());
    assert!(FinancingRepo::find_by_id(&pool, active[0].id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_installments_check_constraint(pool: PgPool) {
    let course = CourseRepo::create(&pool, &new_course("nutricion", true)).await.unwrap();
    let result = FinancingRepo::create(
        &pool,
        course.id,
        &CreateFinancingOption {
            label: "Demasiadas".to_string(),
            installments: 61,
            monthly_rate_bps: None,
            is_active: None,
        },
    )
    .await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Professionals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_professionals_order_and_visibility(pool: PgPool) {
    let hidden = ProfessionalRepo::create(&pool, &new_professional("Zoe", 0, false))
        .await
        .unwrap();
    ProfessionalRepo::create(&pool, &new_professional("Marta", 2, true)).await.unwrap();
    ProfessionalRepo::create(&pool, &new_professional("Luis", 1, true)).await.unwrap();

    let names: Vec<String> = ProfessionalRepo::list(&pool, true)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Luis", "Marta"]);
    assert!(ProfessionalRepo::find_by_id(&pool, hidden.id, true)
        .await
        .unwrap()
        .is_none());

    let shown = ProfessionalRepo::update(
        &pool,
        hidden.id,
        &UpdateProfessional {
            is_active: Some(true),
            specialties: Some(vec!["Clínica".to_string(), "Pediatría".to_string()]),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(shown.is_active);
    assert_eq!(shown.specialties.len(), 2);
    assert!(ProfessionalRepo::delete(&pool, hidden.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Library
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_library_file_lifecycle(pool: PgPool) {
    let file = LibraryFileRepo::create(
        &pool,
        &CreateLibraryFile {
            title: "Guía alimentaria".to_string(),
            description: None,
            object_path: "library/guia.pdf".to_string(),
            public_url: "https://cdn.example.com/library/guia.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            size_bytes: 2048,
            uploaded_by: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(LibraryFileRepo::list(&pool).await.unwrap().len(), 1);
    let removed = LibraryFileRepo::delete(&pool, file.id).await.unwrap().unwrap();
    assert_eq!(removed.object_path, "library/guia.pdf");
    assert!(LibraryFileRepo::find_by_id(&pool, file.id).await.unwrap().is_none());
}
