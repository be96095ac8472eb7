//! Terminal rendering.

use anyhow::Result;
use serde::Serialize;

use cropwise_core::AdviceResult;
use cropwise_runtime::{
    PointsSummary, PostDetail, PostSummary, ReferenceBoard, ReferenceEntry, ReferenceRecord,
    UserProfile,
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_advice(result: &AdviceResult) {
    for message in result.messages() {
        println!("- {}", message);
    }
}

pub fn print_user(user: &UserProfile) {
    println!("{} (#{})", user.username, user.id);
    if !user.region.is_empty() {
        println!("Region: {}", user.region);
    }
    println!("Points: {}", user.points);
}

fn author(name: Option<&str>) -> &str {
    name.unwrap_or("anonymous")
}

pub fn print_posts(posts: &[PostSummary]) {
    if posts.is_empty() {
        println!("No posts yet.");
        return;
    }

    for post in posts {
        let crop = if post.crop.is_empty() {
            String::new()
        } else {
            format!(" [{}]", post.crop)
        };
        println!(
            "#{:<4} {}{} by {} at {}",
            post.id,
            post.title,
            crop,
            author(post.author.as_deref()),
            post.created_at.format(TIME_FORMAT)
        );
    }
}

pub fn print_detail(detail: &PostDetail) {
    let post = &detail.post;
    println!("#{} {}", post.id, post.title);
    if !post.crop.is_empty() {
        println!("Crop: {}", post.crop);
    }
    println!(
        "Asked by {} at {}",
        author(post.author.as_deref()),
        post.created_at.format(TIME_FORMAT)
    );
    println!();
    println!("{}", post.content);
    println!();

    if detail.answers.is_empty() {
        println!("No answers yet.");
        return;
    }

    println!("Answers ({}):", detail.answers.len());
    for answer in &detail.answers {
        println!(
            "  - {} ({} at {})",
            answer.content,
            author(answer.author.as_deref()),
            answer.created_at.format(TIME_FORMAT)
        );
    }
}

pub fn print_points(summary: &PointsSummary) {
    println!("Points: {}", summary.points);
    for tx in &summary.transactions {
        println!(
            "  {:+} {} ({})",
            tx.points,
            tx.reason,
            tx.created_at.format(TIME_FORMAT)
        );
    }
}

fn describe(entry: &ReferenceEntry) -> String {
    match &entry.record {
        ReferenceRecord::Weather { location, forecast } => format!("{}: {}", location, forecast),
        ReferenceRecord::CropCare { crop_name, technique } => format!("{}: {}", crop_name, technique),
        ReferenceRecord::Price { crop_name, price } => format!("{}: {:.2}", crop_name, price),
        ReferenceRecord::Scheme { scheme_name, details } => format!("{}: {}", scheme_name, details),
    }
}

pub fn print_board(board: &ReferenceBoard) {
    let sections = [
        ("Weather", &board.weather),
        ("Crop care", &board.crop_care),
        ("Prices", &board.prices),
        ("Schemes", &board.schemes),
    ];

    for (title, entries) in sections {
        println!("{}:", title);
        if entries.is_empty() {
            println!("  (none)");
        }
        for entry in entries.iter() {
            println!("  {}", describe(entry));
        }
    }
}
