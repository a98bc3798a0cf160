//! Integration tests for parsing exported documents and fragments.

use std::time::Duration;

use codelab_gdoc::{parse, parse_fragment};
use codelab_model::{
    ButtonNode, CodeNode, ContentNode, HeaderKind, HeaderNode, ImageNode, ImportNode,
    InfoboxNode, ItemsKind, ItemsListNode, ListNode, Polarity, SurveyGroup, SurveyNode, TextNode,
    UrlNode,
};

/// Join the lines of an indented markup literal, trimming each line, so
/// source indentation does not leak into text runs.
fn trim_markup_space(markup: &str) -> String {
    markup.lines().map(str::trim).collect()
}

fn text(value: &str) -> ContentNode {
    ContentNode::text(value)
}

fn styled(node: TextNode) -> ContentNode {
    ContentNode::Text(node)
}

fn para(children: Vec<ContentNode>) -> ContentNode {
    ContentNode::List(ListNode::block(children))
}

fn item(children: Vec<ContentNode>) -> ListNode {
    ListNode::new(children)
}

const DOC: &str = r##"
<html><head><style>
    .meta { color: #b7b7b7 }
    .code { font-family: "Courier New" }
    .term { font-family: "Consolas" }
    .btn { background-color: #6aa84f }
    .bold { font-weight: bold }
    .ita { font-style: italic }
    .nibox { background-color: #fce5cd }
    .survey { background-color: #cfe2f3 }
    .comment { border: 1px solid black }
</style></head>
<body>
    <p class="title"><a name="a1"></a><span>Test Codelab</span></p>

    <p>this should be ignored</p>

    <h1><a name="a2"></a><span>Overview</span></h1>
    <p><span class="meta">Duration: 1:00</span></p>

    <img src="https://host/image.png">
    <p><img src="https://host/small.png" style="height: 10px; width: 25.5px"> icon.</p>

    <h3><a name="a3"></a><span>What you&rsquo;ll learn</span></h3>
    <ul class="start">
    <li><span>First </span><span>One</span><sup><a href="#cmnt1" name="cmnt_ref1" target="_blank">[a]</a></sup></li>
    <li><span>Two </span><span><a href="https://google.com/url?q=http%3A%2F%2Fexample.com">Link</a></span></li>
    </ul>
    <ul><li><span>Three</span></li></ul>

    <p>This is<span class="code"> code</span>.</p>
    <p>Just <span>a</span> paragraph.</p>
    <p><a href="url">one</a><a href="url"> url</a></p>
    <p><span class="btn"><a href="http://example.com">Download Zip</a></span></p>
    <p>
        <span class="bold">Bo</span><span>&nbsp;</span><span class="bold">ld</span>
        <span class="ita"> italic</span> text <span class="bold ita">or both.</span></p>

    <h3><a href="http://host/file.java">a file</a></h3>
    <table cellpadding="0" cellspacing="0"><tbody><tr>
    <td colspan="1" rowspan="1">
        <p><span class="code">start func() {<br>}</span></p>
        <p><span class="code"></span></p>
        <p><span class="code">func2() {<br>}</span><span class="code">&nbsp;// comment</span></p>
    </td>
    </tr></tbody></table>

    <table cellpadding="0" cellspacing="0"><tbody><tr>
    <td colspan="1" rowspan="1">
        <p><span class="term">adb shell am start -a VIEW \</span></p>
        <p><span class="term">-d &quot;http://host&quot; app</span></p>
    </td>
    </tr></tbody></table>

    <table cellpadding="0" cellspacing="0"><tbody><tr>
    <td class="nibox" colspan="1" rowspan="1">
        <p><span class="bold">warning</span></p>
        <p><span>negative box.</span></p>
    </td>
    </tr></tbody></table>

    <table cellpadding="0" cellspacing="0"><tbody><tr>
    <td class="survey" colspan="1" rowspan="1">
    <h4><a name="x"></a><span class="code">How</span><span class="ita">&nbsp;will you use it?</span></h4>
    <ul><li class="bold"><span class="c5">Read it</span></li></ul>
    <ul><li class="c23 c47"><span class="c5">Read and complete</span></li></ul>
    <p class="c23 c44"><span class="c5"></span></p>
    <h4><a name="asd"></a><span>How</span><span>&nbsp;would you rate?</span></h4>
    <ul>
        <li class="c19 c47"><span class="c5">Novice</span></li>
        <li class="c19 c47"><span class="c5">Intermediate</span></li>
        <li class="c19 c47"><span class="c5">Proficient</span></li>
    </ul>
    <p class="c23 c44"><span class="c5"></span></p>
    </td>
    </tr></tbody></table>
    <div class="comment">
    <p><a href="#cmnt_ref1" name="cmnt1">[a]</a><span class="c16 c8">Test comment.</span></p>
    </div>
</body>
</html>
"##;

fn expected_overview() -> Vec<ContentNode> {
    let mut checklist = ItemsListNode::new(ItemsKind::Checklist);
    checklist.items = vec![
        item(vec![text("First One")]),
        item(vec![
            text("Two "),
            ContentNode::Url(UrlNode::new("http://example.com", text("Link"))),
        ]),
        item(vec![text("Three")]),
    ];

    let mut check_header = HeaderNode::new(3, text("What you\u{2019}ll learn"));
    check_header.kind = HeaderKind::Check;

    vec![
        para(vec![ContentNode::Image(ImageNode {
            url: "https://host/image.png".to_string(),
            max_width: None,
        })]),
        para(vec![
            ContentNode::Image(ImageNode {
                url: "https://host/small.png".to_string(),
                max_width: Some(25.5),
            }),
            text(" icon."),
        ]),
        ContentNode::Header(check_header),
        ContentNode::ItemsList(checklist),
        para(vec![
            text("This is "),
            styled(TextNode::new("code").code()),
            text("."),
        ]),
        para(vec![text("Just a paragraph.")]),
        para(vec![ContentNode::Url(UrlNode::new("url", text("one url")))]),
        para(vec![ContentNode::Url(UrlNode::new(
            "http://example.com",
            ContentNode::Button(ButtonNode {
                colored: true,
                raised: true,
                download: true,
                child: Box::new(text("Download Zip")),
            }),
        ))]),
        para(vec![
            styled(TextNode::new("Bo ld").bold()),
            styled(TextNode::new(" italic").italic()),
            text(" text "),
            styled(TextNode::new("or both.").bold().italic()),
        ]),
        ContentNode::Header(HeaderNode::new(
            3,
            ContentNode::Url(UrlNode::new("http://host/file.java", text("a file"))),
        )),
        ContentNode::Code(CodeNode {
            value: "start func() {\n}\n\nfunc2() {\n} // comment".to_string(),
            is_console: false,
            block_index: 1,
        }),
        ContentNode::Code(CodeNode {
            value: "adb shell am start -a VIEW \\\n-d \"http://host\" app".to_string(),
            is_console: true,
            block_index: 2,
        }),
        ContentNode::Infobox(InfoboxNode {
            polarity: Polarity::Negative,
            children: vec![
                para(vec![styled(TextNode::new("warning").bold())]),
                para(vec![text("negative box.")]),
            ],
        }),
        ContentNode::Survey(SurveyNode {
            id: "test-codelab-1".to_string(),
            groups: vec![
                SurveyGroup {
                    name: "How will you use it?".to_string(),
                    options: vec!["Read it".to_string(), "Read and complete".to_string()],
                },
                SurveyGroup {
                    name: "How would you rate?".to_string(),
                    options: vec![
                        "Novice".to_string(),
                        "Intermediate".to_string(),
                        "Proficient".to_string(),
                    ],
                },
            ],
        }),
    ]
}

#[test]
fn test_parse_doc() {
    let codelab = parse(&trim_markup_space(DOC)).unwrap();
    assert_eq!(codelab.title, "Test Codelab");
    assert_eq!(codelab.id, "test-codelab");
    assert_eq!(codelab.steps.len(), 1);

    let step = &codelab.steps[0];
    assert_eq!(step.title, "Overview");
    assert_eq!(step.duration, Duration::from_secs(60));
    assert_eq!(step.content.children, expected_overview());
}

#[test]
fn test_parse_top_code_block() {
    let markup = r#"
    <style>.code { font-family: "Courier New" } .term { font-family: "Consolas" }</style>
    <table cellpadding="0" cellspacing="0"><tbody><tr>
    <td colspan="1" rowspan="1">
        <p><span class="code">start func() {<br>}</span><span class="code"></span></p>
        <p><span class="code"></span></p>
        <p><span class="code">func2() {<br>}</span><span class="code">&nbsp;// comment</span></p>
    </td>
    </tr></tbody></table>

    <table cellpadding="0" cellspacing="0"><tbody><tr>
    <td colspan="1" rowspan="1">
        <p><span class="term">adb shell am start -a VIEW \</span></p>
        <p><span class="term">-d &quot;http://host&quot; app</span></p>
    </td>
    </tr></tbody></table>
    "#;
    let nodes = parse_fragment(&trim_markup_space(markup)).unwrap();
    assert_eq!(
        nodes,
        vec![
            ContentNode::Code(CodeNode {
                value: "start func() {\n}\n\nfunc2() {\n} // comment".to_string(),
                is_console: false,
                block_index: 1,
            }),
            ContentNode::Code(CodeNode {
                value: "adb shell am start -a VIEW \\\n-d \"http://host\" app".to_string(),
                is_console: true,
                block_index: 2,
            }),
        ]
    );
}

fn step_duration(paragraph: &str) -> Duration {
    let markup = format!(
        "<html><head><style>.c9{{color:#b7b7b7}}</style></head>\
         <body><h1>Step</h1>{paragraph}</body></html>"
    );
    parse(&markup).unwrap().steps[0].duration
}

#[test]
fn test_parse_step_duration() {
    let minute = Duration::from_secs(60);
    let cases = [
        (r#"<p><span class="c9">Duration: 1:30</span></p>"#, minute * 2),
        (r#"<p><span class="c9">Duration: 1:30 </span></p>"#, minute * 2),
        (r#"<p><span class="c9">Duration: 1:30</span> </p>"#, minute * 2),
        (r#"<p><span class="c9">Duration : 5</span></p>"#, minute * 5),
        (r#"<p><span class="c9">duration: 1</span></p>"#, minute),
    ];
    for (markup, want) in cases {
        assert_eq!(step_duration(markup), want, "{markup}");
    }
}

#[test]
fn test_duration_only_before_step_content() {
    let duration = step_duration(
        r#"<p>First things first.</p><p><span class="c9">Duration: 5</span></p>"#,
    );
    assert_eq!(duration, Duration::ZERO);
}

#[test]
fn test_malformed_duration_is_ignored() {
    let markup = "<html><head><style>.c9{color:#b7b7b7}</style></head><body>\
                  <h1>Step</h1><p><span class=\"c9\">Duration: later</span></p><p>body</p>\
                  </body></html>";
    let codelab = parse(markup).unwrap();
    assert_eq!(codelab.steps[0].duration, Duration::ZERO);
    assert_eq!(codelab.steps[0].content.children, vec![para(vec![text("body")])]);
}

#[test]
fn test_first_duration_annotation_wins() {
    let markup = "<html><head><style>.c9{color:#b7b7b7}</style></head><body>\
                  <h1>Step</h1>\
                  <p><span class=\"c9\">Duration: 5</span></p>\
                  <p><span class=\"c9\">Duration: 10</span></p>\
                  <p>body</p></body></html>";
    let codelab = parse(markup).unwrap();
    assert_eq!(codelab.steps[0].duration, Duration::from_secs(300));
}

#[test]
fn test_block_index_restarts_per_step() {
    let markup = "<html><head><style>.c{font-family:'Courier New'}</style></head><body>\
                  <h1>One</h1>\
                  <table><tr><td><p><span class=\"c\">a</span></p></td></tr></table>\
                  <p>between</p>\
                  <table><tr><td><p><span class=\"c\">b</span></p></td></tr></table>\
                  <h1>Two</h1>\
                  <table><tr><td><p><span class=\"c\">c</span></p></td></tr></table>\
                  </body></html>";
    let codelab = parse(markup).unwrap();
    let indices = |step: usize| -> Vec<u32> {
        codelab.steps[step]
            .content
            .children
            .iter()
            .filter_map(|node| match node {
                ContentNode::Code(code) => Some(code.block_index),
                _ => None,
            })
            .collect()
    };
    assert_eq!(indices(0), [1, 2]);
    assert_eq!(indices(1), [1]);
}

#[test]
fn test_checklist_merges_with_following_plain_list() {
    let nodes = parse_fragment(
        "<h2>What we've covered</h2>\
         <ul><li>one</li><li>two</li></ul>\
         <ol><li>three</li></ol>",
    )
    .unwrap();
    assert_eq!(nodes.len(), 2);
    let ContentNode::ItemsList(list) = &nodes[1] else {
        panic!("expected items list, got {:?}", nodes[1]);
    };
    assert_eq!(list.kind, ItemsKind::Checklist);
    let texts: Vec<String> = list
        .items
        .iter()
        .map(|item| ContentNode::List(item.clone()).text_content())
        .collect();
    assert_eq!(texts, ["one", "two", "three"]);
}

#[test]
fn test_nested_list_levels() {
    let nodes = parse_fragment(
        "<ul class=\"lst-kix_a-0 start\"><li>top</li></ul>\
         <ol class=\"lst-kix_a-1 start\"><li>inner</li></ol>\
         <ul class=\"lst-kix_a-0\"><li>next</li></ul>",
    )
    .unwrap();
    assert_eq!(nodes.len(), 1);
    let ContentNode::ItemsList(list) = &nodes[0] else {
        panic!("expected items list");
    };
    assert_eq!(list.kind, ItemsKind::Plain);
    assert_eq!(list.items.len(), 2);
    let mut inner = ItemsListNode::new(ItemsKind::Ordered);
    inner.new_item().append(text("inner"));
    assert_eq!(
        list.items[0].children,
        vec![text("top"), ContentNode::ItemsList(inner)]
    );
}

#[test]
fn test_import_paragraphs() {
    let nodes = parse_fragment(
        "<p>[[import <a href=\"https://docs.google.com/document/d/abc/edit\">shared</a>]]</p>\
         <p>[[import https://host/fragment.html]]</p>\
         <p>[[imported]] is not an import</p>",
    )
    .unwrap();
    assert_eq!(
        nodes[..2],
        [
            ContentNode::Import(ImportNode::new("https://docs.google.com/document/d/abc/edit")),
            ContentNode::Import(ImportNode::new("https://host/fragment.html")),
        ]
    );
    assert_eq!(nodes.len(), 3);
}

#[test]
fn test_positive_infobox() {
    let nodes = parse_fragment(
        "<style>.tip{background-color:#d9ead3;border-top-style:solid}</style>\
         <table><tr><td class=\"tip\"><p>Good idea.</p></td></tr></table>",
    )
    .unwrap();
    assert_eq!(
        nodes,
        vec![ContentNode::Infobox(InfoboxNode {
            polarity: Polarity::Positive,
            children: vec![para(vec![text("Good idea.")])],
        })]
    );
}

#[test]
fn test_multi_cell_table_flattens() {
    let nodes = parse_fragment(
        "<table><tr><td><p>left</p></td><td><p>right</p></td></tr></table>",
    )
    .unwrap();
    assert_eq!(nodes, vec![para(vec![text("left")]), para(vec![text("right")])]);
}

#[test]
fn test_unknown_styles_degrade_to_text() {
    let nodes = parse_fragment(
        "<style>.x{color:#123456;font-family:Papyrus}</style>\
         <p><span class=\"x\">just text</span></p>",
    )
    .unwrap();
    assert_eq!(nodes, vec![para(vec![text("just text")])]);
}

fn survey_table(question: &str, option: &str) -> String {
    format!(
        "<table><tr><td class=\"poll\"><h4>{question}</h4>\
         <ul><li>{option}</li></ul></td></tr></table>"
    )
}

#[test]
fn test_survey_ids_count_across_steps() {
    let markup = format!(
        "<html><head><style>.poll{{background-color:#cfe2f3}}</style></head><body>\
         <p class=\"title\">Two Polls</p>\
         <h1>One</h1>{}<h1>Two</h1><p>text</p>{}</body></html>",
        survey_table("Ready?", "Yes"),
        survey_table("Done?", "No"),
    );
    let codelab = parse(&markup).unwrap();
    let ids: Vec<&str> = codelab
        .steps
        .iter()
        .flat_map(|step| &step.content.children)
        .filter_map(|node| match node {
            ContentNode::Survey(survey) => Some(survey.id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(ids, vec!["two-polls-1", "two-polls-2"]);
    let ContentNode::Survey(second) = &codelab.steps[1].content.children[1] else {
        panic!("expected a survey, got {:?}", codelab.steps[1].content.children);
    };
    assert_eq!(
        second.groups,
        vec![SurveyGroup {
            name: "Done?".to_string(),
            options: vec!["No".to_string()],
        }]
    );
}

#[test]
fn test_markup_without_html_or_body_parses() {
    let codelab = parse("<p class=\"title\">Bare</p><h1>Only</h1><p>text</p>").unwrap();
    assert_eq!(codelab.id, "bare");
    assert_eq!(codelab.steps.len(), 1);
    assert_eq!(
        codelab.steps[0].content.children,
        vec![para(vec![text("text")])]
    );
    assert_eq!(parse_fragment("").unwrap(), Vec::new());
}

#[test]
fn test_bordered_cells_keep_their_content() {
    let nodes = parse_fragment(
        "<style>.cell{border-right-style:solid;border-top-width:1pt}\
         .code{font-family:'Courier New'}</style>\
         <table><tr><td class=\"cell\"><p>plain</p></td></tr></table>\
         <table><tr><td class=\"cell\"><p><span class=\"code\">x = 1</span></p></td></tr></table>\
         <div class=\"cell\"><p>a comment</p></div>",
    )
    .unwrap();
    assert_eq!(
        nodes,
        vec![
            para(vec![text("plain")]),
            ContentNode::Code(CodeNode {
                value: "x = 1".to_string(),
                is_console: false,
                block_index: 1,
            }),
        ]
    );
}
