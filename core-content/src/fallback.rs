//! Fallback datasets
//!
//! Sample content served whenever live data is unavailable. These statics
//! are never mutated; fetchers clone them into their own state.

use crate::id::ResourceId;
use crate::models::{BlogPost, Document, Project, ResourceRecord, TeamMember, Video};
use crate::transform::{date_label, parse_timestamp, DOCUMENT_THUMBNAIL_PLACEHOLDER, VIDEO_THUMBNAIL_PLACEHOLDER};
use once_cell::sync::Lazy;

const PROJECT_IMAGE: &str = "/charity.jpg";
const TEAM_PHOTO: &str = "/placeholder.svg?height=300&width=250";
const ORG_AUTHOR: &str = "RNADW Team";

fn record(id: i64, title: &str, description: &str, category: &str, date: &str) -> ResourceRecord {
    ResourceRecord {
        id: ResourceId::from(id),
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        date_label: date.to_string(),
        created_at: None,
    }
}

/// Record whose date label is derived from a timestamp.
fn dated_record(
    id: i64,
    title: &str,
    description: &str,
    category: &str,
    timestamp: &str,
) -> ResourceRecord {
    let (label, created_at) = date_label(Some(timestamp));
    ResourceRecord {
        date_label: label,
        created_at,
        ..record(id, title, description, category, "")
    }
}

#[allow(clippy::too_many_arguments)]
fn video(
    id: i64,
    title: &str,
    date: &str,
    duration: &str,
    description: &str,
    slug: &str,
    views: u64,
    category: &str,
) -> Video {
    Video {
        record: record(id, title, description, category, date),
        thumbnail: VIDEO_THUMBNAIL_PLACEHOLDER.to_string(),
        video_url: format!("/videos/{}.mp4", slug),
        duration: duration.to_string(),
        views,
    }
}

fn document(
    id: i64,
    title: &str,
    size: &str,
    date: &str,
    description: &str,
    slug: &str,
    downloads: u64,
    category: &str,
) -> Document {
    Document {
        record: record(id, title, description, category, date),
        file_type: "PDF".to_string(),
        size: size.to_string(),
        thumbnail: DOCUMENT_THUMBNAIL_PLACEHOLDER.to_string(),
        downloads,
        file_url: format!("/documents/{}.pdf", slug),
        preview_url: format!("/documents/preview/{}.pdf", slug),
    }
}

fn project(
    id: i64,
    title: &str,
    description: &str,
    content: &str,
    category: &str,
    timestamp: &str,
    tags: &[&str],
) -> Project {
    Project {
        record: dated_record(id, title, description, category, timestamp),
        content: content.to_string(),
        image: Some(PROJECT_IMAGE.to_string()),
        author: Some(ORG_AUTHOR.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        status: Some("active".to_string()),
        featured: false,
        updated_at: parse_timestamp(timestamp),
    }
}

fn team_member(id: i64, name: &str, position: &str, bio: &str, email: &str) -> TeamMember {
    TeamMember {
        id: ResourceId::from(id),
        name: name.to_string(),
        position: position.to_string(),
        bio: Some(bio.to_string()),
        image: Some(TEAM_PHOTO.to_string()),
        email: Some(email.to_string()),
    }
}

pub static VIDEOS: Lazy<Vec<Video>> = Lazy::new(|| {
    vec![
        video(
            1,
            "RNADW Introduction - Our Mission",
            "December 2023",
            "5:32",
            "Introduction to Rwanda National Association of Deaf Women (RNADW) and our mission to empower deaf women across Rwanda through education, advocacy, and community support.",
            "rnadw-introduction",
            2450,
            "introduction",
        ),
        video(
            2,
            "Rwandan Sign Language Basics",
            "November 2023",
            "12:45",
            "Learn the fundamentals of Rwandan Sign Language with our expert instructors. Perfect for beginners and families of deaf individuals.",
            "sign-language-basics",
            1890,
            "education",
        ),
        video(
            3,
            "Success Stories - Empowered Women",
            "October 2023",
            "8:20",
            "Inspiring stories from our community members who have overcome challenges and achieved their goals through RNADW programs and support.",
            "success-stories",
            1650,
            "stories",
        ),
        video(
            4,
            "Community Impact - Making a Difference",
            "September 2023",
            "6:15",
            "See how RNADW is making a difference in the community through various programs, advocacy work, and partnerships across Rwanda.",
            "community-impact",
            1420,
            "impact",
        ),
        video(
            5,
            "Vocational Training Workshop",
            "August 2023",
            "15:30",
            "Professional development and skills training sessions for deaf women entrepreneurs, including business skills and financial literacy.",
            "training-workshop",
            980,
            "training",
        ),
        video(
            6,
            "Annual Conference 2023 Highlights",
            "July 2023",
            "22:10",
            "Highlights from our annual conference bringing together deaf women leaders, advocates, and supporters from across Rwanda and beyond.",
            "annual-conference",
            2100,
            "events",
        ),
        video(
            7,
            "Women's Rights Advocacy",
            "June 2023",
            "11:30",
            "Our advocacy work for deaf women's rights, inclusion in society, and equal opportunities in education and employment.",
            "womens-rights",
            1580,
            "advocacy",
        ),
        video(
            8,
            "Health Education Program",
            "May 2023",
            "9:45",
            "Educational content about health awareness, reproductive health, and HIV/AIDS prevention specifically designed for the deaf community.",
            "health-education",
            1320,
            "health",
        ),
        video(
            9,
            "Sign Language Interpreter Training",
            "April 2023",
            "18:20",
            "Training program for sign language interpreters to improve communication accessibility in healthcare, education, and legal settings.",
            "interpreter-training",
            890,
            "training",
        ),
        video(
            10,
            "Youth Mentorship Program",
            "March 2023",
            "7:55",
            "Our mentorship program connecting young deaf women with successful role models and providing guidance for their future careers.",
            "youth-mentorship",
            1150,
            "youth",
        ),
    ]
});

pub static DOCUMENTS: Lazy<Vec<Document>> = Lazy::new(|| {
    vec![
        document(
            1,
            "RNADW Sign Language Alphabets",
            "2.1 MB",
            "March 2023",
            "Complete alphabet guide for Rwandan Sign Language with visual demonstrations",
            "sign-language-alphabets",
            1250,
            "posters",
        ),
        document(
            2,
            "RNADW Rwanda Sign Language Numbers",
            "1.8 MB",
            "March 2023",
            "Comprehensive number system guide for Rwandan Sign Language",
            "sign-language-numbers",
            980,
            "posters",
        ),
        document(
            3,
            "Healthy Decisions About Sexual Consent",
            "1.5 MB",
            "February 2023",
            "Educational brochure on sexual health and consent for deaf adolescents",
            "sexual-consent-guide",
            750,
            "english",
        ),
        document(
            4,
            "HIV/AIDS Prevention and Protection Guide",
            "1.7 MB",
            "February 2023",
            "Comprehensive HIV/AIDS prevention and protection guide for deaf adolescents",
            "hiv-aids-prevention",
            680,
            "english",
        ),
        document(
            6,
            "Gukurikiza Abakobwa Batishoboye",
            "1.6 MB",
            "February 2023",
            "Brochure in Kinyarwanda about empowering deaf girls and women",
            "empowering-deaf-girls-kiny",
            420,
            "kinyarwanda",
        ),
    ]
});

pub static PROJECTS: Lazy<Vec<Project>> = Lazy::new(|| {
    vec![
        project(
            1,
            "Education and Skills Training for Deaf Women and Girls",
            "Providing comprehensive education and vocational training programs to empower deaf women and girls with essential skills for economic independence.",
            "The Education and Skills Training program is one of RNADW's flagship initiatives, addressing educational gaps and providing practical skills training for deaf women and girls across Rwanda.\n\n\
             It combines literacy classes in Kinyarwanda and English, Rwandan Sign Language instruction, vocational training in tailoring, crafts, agriculture and small business management, computer skills, and financial literacy and leadership development.\n\n\
             Since its inception the program has trained over 200 deaf women and girls, many of whom now run their own businesses or have secured employment.",
            "Education",
            "2024-01-01T00:00:00Z",
            &["Education", "Skills Training", "Women Empowerment"],
        ),
        project(
            2,
            "Health and Wellness Program",
            "Promoting health awareness and providing accessible healthcare services specifically designed for the deaf community.",
            "The Health and Wellness Program bridges the communication gap between healthcare providers and the deaf community.\n\n\
             It runs workshops on reproductive health, nutrition and disease prevention, teaches basic sign language to medical staff, brings mobile clinics to remote communities, and offers counseling and support groups for deaf women.\n\n\
             The program has reached over 300 deaf women and girls across all provinces and trained 150 healthcare workers in basic sign language.",
            "Health",
            "2024-01-01T00:00:00Z",
            &["Health", "Wellness", "Community"],
        ),
        project(
            3,
            "Economic Empowerment Initiative",
            "Supporting entrepreneurship and business development among deaf women through microfinance and business training.",
            "The Economic Empowerment Initiative creates sustainable income opportunities for deaf women and girls.\n\n\
             It offers small loans and savings programs, entrepreneurship and business management training, market linkages for products and services, and support for forming deaf women's cooperatives.\n\n\
             Over 150 deaf women have started their own businesses through the program, with a 75% success rate.",
            "Economic",
            "2023-01-01T00:00:00Z",
            &["Economic", "Entrepreneurship", "Microfinance"],
        ),
        project(
            4,
            "Community Advocacy and Rights",
            "Advocating for the rights of deaf women and girls at community and national levels to ensure equal opportunities.",
            "The advocacy program works to ensure the rights of deaf women and girls are recognized and protected.\n\n\
             It engages government on inclusive policy, runs community awareness campaigns, provides legal support to women facing discrimination or violence, and trains deaf women to advocate for their own rights.\n\n\
             The program has secured sign language inclusion in schools and public services and provided legal assistance to over 50 deaf women.",
            "Advocacy",
            "2023-01-01T00:00:00Z",
            &["Advocacy", "Rights", "Policy"],
        ),
        project(
            5,
            "Sign Language Promotion",
            "Promoting the use and recognition of Rwandan Sign Language in schools, workplaces, and public services.",
            "This program promotes and preserves Rwandan Sign Language as a vital communication tool.\n\n\
             It offers sign language classes to hearing and deaf learners, certifies interpreters, develops educational materials and runs public awareness campaigns.\n\n\
             Over 200 interpreters have been trained and a sign language curriculum for schools has been developed with government partners.",
            "Language",
            "2024-01-01T00:00:00Z",
            &["Sign Language", "Education", "Communication"],
        ),
        project(
            6,
            "Leadership Development Program",
            "Building leadership capacity among deaf women to take on leadership roles in their communities and organizations.",
            "The Leadership Development Program empowers deaf women to become leaders in their communities.\n\n\
             It provides leadership workshops, pairs emerging leaders with experienced mentors, trains public speaking and builds a national network of deaf women leaders.\n\n\
             Over 100 deaf women have been trained and 50 emerging leaders paired with mentors.",
            "Leadership",
            "2023-01-01T00:00:00Z",
            &["Leadership", "Capacity Building", "Mentorship"],
        ),
    ]
});

pub static BLOG_POSTS: Lazy<Vec<BlogPost>> = Lazy::new(|| {
    let post = |id: i64, title: &str, category: &str, timestamp: &str, content: &str| {
        let excerpt: String = content.chars().take(150).collect();
        BlogPost {
            record: dated_record(id, title, &excerpt, category, timestamp),
            content: content.to_string(),
            author: ORG_AUTHOR.to_string(),
            excerpt,
            image: Some(PROJECT_IMAGE.to_string()),
        }
    };

    vec![
        post(
            1,
            "Celebrating International Week of Deaf People",
            "events",
            "2023-09-25T00:00:00Z",
            "Members from every province gathered in Kigali to celebrate the International Week of Deaf People with workshops, performances in Rwandan Sign Language and a march for accessible public services.",
        ),
        post(
            2,
            "New Interpreter Cohort Completes Training",
            "training",
            "2023-11-10T00:00:00Z",
            "Twenty new sign language interpreters completed their certification this month and will support deaf women in clinics, courts and classrooms across Rwanda.",
        ),
        post(
            3,
            "Why Accessible Health Information Matters",
            "health",
            "2024-02-14T00:00:00Z",
            "Deaf women are too often left out of public health campaigns. Our brochures in English and Kinyarwanda bring reproductive health and HIV prevention information to the community in an accessible form.",
        ),
    ]
});

pub static TEAM: Lazy<Vec<TeamMember>> = Lazy::new(|| {
    vec![
        team_member(
            1,
            "Marie Claire Uwimana",
            "Executive Director",
            "Marie Claire has over 15 years of experience in disability rights advocacy and has been leading RNADW since its inception.",
            "marie.uwimana@rnadw.org.rw",
        ),
        team_member(
            2,
            "Josephine Mukamana",
            "Program Manager",
            "Josephine oversees all program implementation and has a background in social work and community development.",
            "josephine.mukamana@rnadw.org.rw",
        ),
        team_member(
            3,
            "Grace Uwizeyimana",
            "Community Coordinator",
            "Grace works directly with communities to implement programs and build relationships with local stakeholders.",
            "grace.uwizeyimana@rnadw.org.rw",
        ),
        team_member(
            4,
            "Immaculee Nyiramana",
            "Finance Manager",
            "Immaculee manages all financial operations and ensures transparent use of resources for maximum impact.",
            "immaculee.nyiramana@rnadw.org.rw",
        ),
    ]
});
