use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::content::FeedItem;
use crate::text_utils::format_rfc2822;

/* Example
<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>Anurag Anand</title>
    <link>https://anuraganand.vercel.app</link>
    <description>Software Engineer and UG at IIT Kharagpur</description>
    <atom:link href="https://anuraganand.vercel.app/feed.xml" rel="self" type="application/rss+xml"/>
    <generator>folio</generator>
    <lastBuildDate>Mon, 1 Jan 2024 12:00:00 +0000</lastBuildDate>
    <item>
      <title>Hello</title>
      <link>https://anuraganand.vercel.app/blog/hello</link>
      <guid isPermaLink="true">https://anuraganand.vercel.app/blog/hello</guid>
      <pubDate>Mon, 1 Jan 2024 00:00:00 +0000</pubDate>
      <description><![CDATA[First post]]></description>
    </item>
  </channel>
</rss>
*/

const GENERATOR: &str = "folio";
const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

pub struct RssChannel<'a> {
    pub ch_title: &'a str,
    pub ch_link: &'a str,
    pub ch_desc: &'a str,
    pub feed_url: &'a str,
}

impl<'a> RssChannel<'a> {
    pub fn render(&self, items: &[FeedItem], build_date: DateTime<Utc>) -> quick_xml::Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        rss.push_attribute(("xmlns:atom", ATOM_NS));
        writer.write_event(Event::Start(rss))?;
        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        push_text(&mut writer, "title", self.ch_title)?;
        push_text(&mut writer, "link", self.ch_link)?;
        push_text(&mut writer, "description", self.ch_desc)?;

        let mut self_link = BytesStart::new("atom:link");
        self_link.push_attribute(("href", self.feed_url));
        self_link.push_attribute(("rel", "self"));
        self_link.push_attribute(("type", "application/rss+xml"));
        writer.write_event(Event::Empty(self_link))?;

        push_text(&mut writer, "generator", GENERATOR)?;
        push_text(&mut writer, "lastBuildDate", &build_date.to_rfc2822())?;

        for item in items {
            writer.write_event(Event::Start(BytesStart::new("item")))?;

            push_text(&mut writer, "title", &item.title)?;
            push_text(&mut writer, "link", &item.url)?;

            let mut guid = BytesStart::new("guid");
            guid.push_attribute(("isPermaLink", "true"));
            writer.write_event(Event::Start(guid))?;
            writer.write_event(Event::Text(BytesText::new(&item.url)))?;
            writer.write_event(Event::End(BytesEnd::new("guid")))?;

            push_text(&mut writer, "pubDate", &format_rfc2822(&item.date))?;
            push_cdata(&mut writer, "description", &item.description)?;

            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        let mut xml = writer.into_inner().into_inner();
        xml.push(b'\n');
        Ok(xml)
    }
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn push_cdata(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    // A literal "]]>" would close the section early, split it in two instead
    let text = text.replace("]]>", "]]]]><![CDATA[>");
    writer.write_event(Event::CData(BytesCData::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
