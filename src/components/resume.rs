//! Resume page
//!
//! The resume content is fixed data compiled into the binary. The page is
//! rendered without the site header and with its own stylesheet.

use anyhow::Result;
use serde::Serialize;
use tera::Context;

use super::HeadData;
use crate::templates::TemplateRenderer;

/// One titled line of the resume
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ResumeEntry {
    pub title: &'static str,
    pub text: &'static str,
}

pub const EDUCATION: [&str; 2] = [
    "Computer Engineering - UNISAL (2015 - 2019);",
    "IT Certificate Program and High School - COTIL (2012 - 2014).",
];

pub const TECHNOLOGY_KNOWLEDGE: [ResumeEntry; 6] = [
    ResumeEntry {
        title: "Elixir",
        text: "is currently my most used technology. Have been working on it professionally since 2019, creating mainly Phoenix projects. Had some diverse experience on that like integrating to Kafka, Prometheus, third-party API's libraries and some of the most used patterns like Ports and Adapters. On my free time I also dived into cool applications using GraphQL, decentralized communication and Scenic;",
    },
    ResumeEntry {
        title: "Node.js",
        text: "used it on previous jobs to create microservices and solve smaller problems or routines, mainly running on serverless platforms. I made cool things with Node, using frameworks such as Express, Socket.IO, Sequelize and node-redis;",
    },
    ResumeEntry {
        title: "Python",
        text: "used Python as a tool to generate some reports and for data transformations (for example aggregating database data into CSV). Also learned some introductory resources from Pandas and sklearn;",
    },
    ResumeEntry {
        title: "Ruby",
        text: "worked with Ruby (on Rails) to create and mantain mainly CRUD systems;",
    },
    ResumeEntry {
        title: "Fronted",
        text: "on job experiences and personal projects I always had to develop something related to frontend (like Ruby on Rails and Phoenix html pages for dashboards). Also developed some projects in React, React Native, Angular and Flutter;",
    },
    ResumeEntry {
        title: "Infrastructure",
        text: "I'm not the best person with infrastructure, but in all projects I had been in, I used Docker, continuous integration (Github Actions and CircleCI) and cloud providers (AWS, gCloud and Heroku).",
    },
];

pub const PROFESSIONAL_HISTORY: [ResumeEntry; 5] = [
    ResumeEntry {
        title: "Stone (jan/2020 - present)",
        text: "I joined Stone in a purely Elixir backend team. My first responsibility was to help the team to mantain an user validation platform (a process called KYC). After some while, the team received a responsibility to create a fraud prevention system and we all grew with that. I'm currently leading the Elixir backend team on this fraud prevention system;",
    },
    ResumeEntry {
        title: "Thinkseg (dec/2018 - dec/2019)",
        text: "at Thinkseg my first role was helping to keep an insurance marketplace. It included supporting a front-end Ruby on Rails website and some small services in Node.js to communicate with each insurance company. At a second step, I joined an Elixir team to build a product for customized car insurance;",
    },
    ResumeEntry {
        title: "CI&T (mar/2018 - dec/2018)",
        text: "after some time working alone, I decided to join an internship program to learn things related to team organization (such as Scrum) and CI&T was a great place for it. I worked on a team building systems with GeneXus (used to generate Cobol code) and, after some months, joined a React Native team (but left for another job in few weeks);",
    },
    ResumeEntry {
        title: "Freelancer (jan/2017 - feb/2018)",
        text: "I left my previous job to focus my time on learning more things related to development and studying for the university course. At this time I still working as a consultant building websites and systems;",
    },
    ResumeEntry {
        title: "Arpejo (mar/2015 - dec/2016)",
        text: "in Arpejo, an advertising agency, I started my career building templates for email-marketing, using just HTML and CSS. After some time I started creating websites (mostly a frontend effort) using Wordpress and PHP. After that, I built some systems (such as lead management dashboard) using Symfony (PHP) and Ruby on Rails.",
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct Resume {
    pub name: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub role: &'static str,
    pub education: &'static [&'static str],
    pub technology_knowledge: &'static [ResumeEntry],
    pub professional_history: &'static [ResumeEntry],
}

impl Default for Resume {
    fn default() -> Self {
        Self {
            name: "Felipe Eduardo Duzzi",
            phone: "+55 19 99380 1380",
            email: "duzzifelipe@gmail.com",
            role: "Fullstack Developer",
            education: &EDUCATION,
            technology_knowledge: &TECHNOLOGY_KNOWLEDGE,
            professional_history: &PROFESSIONAL_HISTORY,
        }
    }
}

impl Resume {
    pub const TITLE: &'static str = "Resume";
    pub const PATH: &'static str = "resume/";

    pub fn render(&self, templates: &TemplateRenderer, head: &HeadData) -> Result<String> {
        let mut context = Context::new();
        context.insert("head", head);
        context.insert("resume", self);
        templates.render("resume.html", &context)
    }
}
