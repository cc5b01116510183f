#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Five rows: four dated releases across three months, one undated row
pub const SAMPLE_CSV: &str = "\
id,repo,package_name,version,author,published_at_kst,is_prerelease,is_draft,major_changes,minor_changes,patch_changes,other_changes,working_days,year,month
1,app,app-core,1.0.0,kim,2024-01-05 10:00:00,false,false,['rewrite'],[],[],[],3,2024,1
2,app,app-core,1.1.0-beta.1,lee,2024-02-01 09:30:00,true,false,[],['feature'],[],[],9,2024,2
3,lib,lib-util,0.3.0,kim,2024-02-10 14:00:00,false,false,[],[],['fix'],['docs'],4,2024,2
4,lib,lib-util,0.3.1,park,2024-03-02 11:00:00,false,false,[],[],[],[],0,2024,3
5,tool,tool-cli,2.0.0,lee,,false,false,['cli'],[],[],[],5,,
";

pub fn write_csv(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).unwrap();
    path
}

/// One dated row per repository with the given working days
pub fn csv_with_durations(rows: &[(&str, u32)]) -> String {
    let mut csv = String::from("id,repo,author,published_at_kst,is_prerelease,working_days\n");
    for (index, (repo, days)) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},dev,2024-05-{:02} 12:00:00,false,{}\n",
            index + 1,
            repo,
            (index % 28) + 1,
            days
        ));
    }
    csv
}
